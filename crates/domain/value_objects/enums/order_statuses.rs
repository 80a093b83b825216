use std::fmt::Display;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl OrderStatus {
    pub const TERMINAL: [OrderStatus; 3] = [
        OrderStatus::Success,
        OrderStatus::Failed,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Success => "SUCCESS",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    /// Finalized orders are never written back to `PENDING`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "SUCCESS" => Ok(OrderStatus::Success),
            "FAILED" => Ok(OrderStatus::Failed),
            "REFUNDED" => Ok(OrderStatus::Refunded),
            other => bail!("unknown order status: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        for status in OrderStatus::TERMINAL {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
    }

    #[test]
    fn parses_stored_values_case_insensitively() {
        assert_eq!(OrderStatus::try_from("SUCCESS").unwrap(), OrderStatus::Success);
        assert_eq!(OrderStatus::try_from("failed").unwrap(), OrderStatus::Failed);
        assert!(OrderStatus::try_from("captured").is_err());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Refunded).unwrap();
        assert_eq!(json, "\"REFUNDED\"");

        let parsed: OrderStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(parsed, OrderStatus::Pending);
    }
}
