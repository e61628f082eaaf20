//! Billing gateway port for external payment processing.
//!
//! Defines the contract for billing providers (e.g., Stripe behind a backend
//! function). The application layer drives checkout, portal access, and
//! cancellation through this trait without knowing whether a live provider
//! or the offline gateway is behind it.
//!
//! # Design
//!
//! - **Strategy, not flags**: live vs. offline is an implementation choice,
//!   selected once at wiring time
//! - **Explicit outcomes**: checkout reports either a redirect or a direct
//!   plan change, so callers never infer mode from a nullable URL

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::BillingInterval;

/// Port for billing provider integrations.
///
/// All operations must be safe to retry.
#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// Start a checkout for a plan and billing interval.
    ///
    /// A live gateway returns a redirect URL to the provider's hosted page;
    /// the offline gateway resolves immediately to a direct plan change.
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, GatewayError>;

    /// Open a billing portal session for self-service management.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, GatewayError>;

    /// Request cancellation at the end of the current period.
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), GatewayError>;

    /// Withdraw a pending cancellation.
    async fn reactivate_subscription(&self, subscription_id: &str) -> Result<(), GatewayError>;
}

/// Request to start a checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Plan identifier to subscribe to.
    pub plan: String,

    /// Monthly or yearly billing.
    pub interval: BillingInterval,

    /// URL to land on after a completed checkout.
    pub success_url: String,

    /// URL to land on after an abandoned checkout.
    pub cancel_url: String,
}

/// How a checkout request resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Send the user to the provider's hosted checkout page.
    Redirect { url: String },

    /// The plan change already took effect; no payment flow needed.
    DirectUpgrade { plan: String },
}

/// Portal session for subscription self-service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    /// URL for the customer to access the portal.
    pub url: String,
}

/// Errors from billing gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(GatewayErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        let code = match err.code {
            GatewayErrorCode::NotFound => ErrorCode::NotFound,
            _ => ErrorCode::GatewayError,
        };
        DomainError::new(code, err.message)
    }
}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError | GatewayErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
