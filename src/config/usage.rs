//! Usage reconciliation configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Usage reconciliation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    /// How stale the local record may get, in seconds, before a reload from
    /// the backend is due.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,
}

fn default_reconcile_interval() -> u64 {
    300
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: default_reconcile_interval(),
        }
    }
}

impl UsageConfig {
    /// Validate usage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reconcile_interval_secs == 0 {
            return Err(ValidationError::InvalidReconcileInterval);
        }
        Ok(())
    }
}
