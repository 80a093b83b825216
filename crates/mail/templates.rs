use crate::domain::value_objects::{
    enums::order_statuses::OrderStatus, mail::OutgoingMail,
};

/// Everything a payment mail needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMailContext {
    pub to_email: String,
    pub to_name: String,
    pub event_title: String,
    pub amount_minor: i64,
    pub currency: String,
    pub order_id: String,
    pub transaction_id: Option<String>,
}

pub fn render_payment_mail(status: OrderStatus, ctx: &PaymentMailContext) -> OutgoingMail {
    let (subject, headline, body) = match status {
        OrderStatus::Pending => (
            format!("Your payment for {} is pending", ctx.event_title),
            "Payment pending",
            "We have not received confirmation of your payment yet. If you closed the checkout \
             by mistake you can try again from your dashboard. No further action is needed if \
             the amount was already debited; we will update you once it settles.",
        ),
        OrderStatus::Success => (
            format!("Registration confirmed: {}", ctx.event_title),
            "Payment successful",
            "Thank you! Your payment was received and your registration is confirmed.",
        ),
        OrderStatus::Failed => (
            format!("Payment failed for {}", ctx.event_title),
            "Payment failed",
            "Unfortunately your payment could not be completed. Any amount debited will be \
             reversed by your bank. You can retry the registration at any time.",
        ),
        OrderStatus::Refunded => (
            format!("Refund processed for {}", ctx.event_title),
            "Refund processed",
            "Your payment has been refunded. It can take 5-7 working days to reflect in your account.",
        ),
    };

    let transaction_row = ctx
        .transaction_id
        .as_deref()
        .map(|id| row("Transaction ID", id))
        .unwrap_or_default();

    let html_body = format!(
        "<!DOCTYPE html>\
<html><body style=\"font-family:Arial,sans-serif;color:#222\">\
<h2>{headline}</h2>\
<p>Hi {name},</p>\
<p>{body}</p>\
<table cellpadding=\"6\" style=\"border-collapse:collapse\">{event}{amount}{order}{transaction}{status}</table>\
</body></html>",
        headline = headline,
        name = escape_html(&ctx.to_name),
        body = body,
        event = row("Event", &ctx.event_title),
        amount = row("Amount", &format_amount(ctx.amount_minor, &ctx.currency)),
        order = row("Order ID", &ctx.order_id),
        transaction = transaction_row,
        status = row("Status", status.as_str()),
    );

    OutgoingMail {
        to_email: ctx.to_email.clone(),
        to_name: Some(ctx.to_name.clone()).filter(|name| !name.trim().is_empty()),
        subject,
        html_body,
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
        label,
        escape_html(value)
    )
}

/// Formats minor units as `INR 1,234.50` style text. Grouping is by thousands.
pub fn format_amount(amount_minor: i64, currency: &str) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let major = (abs / 100).to_string();
    let minor = abs % 100;

    let mut grouped = String::with_capacity(major.len() + major.len() / 3);
    for (i, ch) in major.chars().enumerate() {
        if i > 0 && (major.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{} {}{}.{:02}", currency, sign, grouped, minor)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
