use std::collections::HashMap;

use anyhow::{Context, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Minimal Razorpay client built on reqwest.
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
    api_base: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayEvent {
    pub event: String,
    #[serde(default)]
    pub payload: RazorpayEventPayload,
    pub created_at: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RazorpayEventPayload {
    pub payment: Option<RazorpayEntity<RazorpayPayment>>,
    pub order: Option<RazorpayEntity<RazorpayOrderEntity>>,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayEntity<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<i64>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrderEntity {
    pub id: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorEnvelope {
    error: RazorpayErrorDetails,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetails {
    code: Option<String>,
    description: Option<String>,
    field: Option<String>,
    reason: Option<String>,
}

impl RazorpayEvent {
    /// Gateway order id the event refers to, taken from the payment entity first.
    pub fn order_id(&self) -> Option<&str> {
        self.payload
            .payment
            .as_ref()
            .and_then(|payment| payment.entity.order_id.as_deref())
            .or_else(|| self.payload.order.as_ref().map(|order| order.entity.id.as_str()))
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payload
            .payment
            .as_ref()
            .map(|payment| payment.entity.id.as_str())
    }
}

impl RazorpayClient {
    pub fn new(
        key_id: String,
        key_secret: String,
        webhook_secret: String,
        api_base: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
            webhook_secret,
            api_base: api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (error_code, error_description, error_field, error_reason) =
            match serde_json::from_str::<RazorpayErrorEnvelope>(&body) {
                Ok(envelope) => {
                    let details = envelope.error;
                    (
                        details.code,
                        details.description,
                        details.field,
                        details.reason,
                    )
                }
                Err(_) => (None, None, None, None),
            };

        error!(
            status = %status,
            razorpay_error_code = ?error_code,
            razorpay_error_description = ?error_description,
            razorpay_error_field = ?error_field,
            razorpay_error_reason = ?error_reason,
            response_body = %body,
            context = %context,
            "razorpay api request failed"
        );

        anyhow::bail!(
            "Razorpay API request failed: {} (status {}, code={:?})",
            context,
            status,
            error_code
        );
    }

    /// Creates an order the checkout widget can be opened against.
    /// https://razorpay.com/docs/api/orders/create/
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> Result<RazorpayOrder> {
        let body = CreateOrderBody {
            amount: amount_minor,
            currency,
            receipt,
            notes,
        };

        let resp = self
            .http
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .context("failed to reach razorpay")?;
        let resp = Self::ensure_success(resp, "create order").await?;

        let order: RazorpayOrder = resp.json().await?;
        Ok(order)
    }

    /// Checks the signature the checkout widget hands back after a successful payment:
    /// hex(HMAC-SHA256(key_secret, "<order_id>|<payment_id>")).
    /// https://razorpay.com/docs/payments/server-integration/rust/payment-gateway/build-integration/
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        let message = format!("{}|{}", order_id, payment_id);
        verify_hex_signature(self.key_secret.as_bytes(), message.as_bytes(), signature)
    }

    /// Verifies the `X-Razorpay-Signature` header against the raw body and parses the
    /// event. https://razorpay.com/docs/webhooks/validate-test/
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<RazorpayEvent> {
        if !verify_hex_signature(self.webhook_secret.as_bytes(), payload, signature) {
            anyhow::bail!("invalid webhook signature");
        }

        let event: RazorpayEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }
}

pub fn sign_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac accepts keys of any size"),
    };
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a hex encoded HMAC-SHA256 signature.
pub fn verify_hex_signature(secret: &[u8], message: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(&provided).is_ok()
}
