//! Subscription backend port.
//!
//! The backend is the system of record for subscription state and usage
//! counters. The application layer reads records and snapshots through this
//! trait and reports local creations back to it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::SubscriptionRecord;
use crate::domain::usage::UsageSnapshot;

/// Port for the subscription record and usage counter store.
#[async_trait]
pub trait SubscriptionBackend: Send + Sync {
    /// Fetch the current subscription record.
    ///
    /// Implementations return the free default record when the caller has
    /// no record yet; absence is not an error.
    async fn fetch_subscription(&self) -> Result<SubscriptionRecord, BackendError>;

    /// Fetch the current-period usage counters.
    async fn fetch_usage(&self) -> Result<UsageSnapshot, BackendError>;

    /// Report one more unit of `resource` consumed.
    ///
    /// Returns the authoritative count after the increment.
    async fn increment_usage(&self, resource: &str) -> Result<u64, BackendError>;
}

/// Errors from the subscription backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Network connectivity issue.
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the request.
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Network(_) => true,
            BackendError::Rejected { status, .. } => *status >= 500 || *status == 429,
            BackendError::MalformedResponse(_) => false,
        }
    }
}

impl From<BackendError> for DomainError {
    fn from(err: BackendError) -> Self {
        DomainError::new(ErrorCode::BackendError, err.to_string())
    }
}
