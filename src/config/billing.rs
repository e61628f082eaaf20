//! Billing configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which billing gateway implementation to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMode {
    /// Real backend billing endpoints.
    Live,

    /// Local resolution, no network. Default for demo environments.
    #[default]
    Offline,
}

/// Billing configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfig {
    /// Gateway selection.
    #[serde(default)]
    pub mode: BillingMode,

    /// Base URL for the backend billing and subscription endpoints.
    /// Required in live mode.
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key for the backend endpoints. Required in live mode.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl BillingConfig {
    /// Check if the offline gateway is selected.
    pub fn is_offline(&self) -> bool {
        self.mode == BillingMode::Offline
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == BillingMode::Offline {
            return Ok(());
        }

        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ValidationError::MissingRequired("BILLING__BASE_URL"))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBillingUrl);
        }

        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(ValidationError::MissingRequired("BILLING__API_KEY")),
        }
    }
}
