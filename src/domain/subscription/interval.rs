//! Billing interval.

use serde::{Deserialize, Serialize};

/// How often the subscription is billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    /// Billed every month.
    #[default]
    Monthly,

    /// Billed once a year, at a discount.
    Yearly,
}

impl BillingInterval {
    /// Wire representation, matching the backend column values.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_monthly() {
        assert_eq!(BillingInterval::default(), BillingInterval::Monthly);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&BillingInterval::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
    }

    #[test]
    fn deserializes_from_lowercase() {
        let interval: BillingInterval = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(interval, BillingInterval::Monthly);
    }
}
