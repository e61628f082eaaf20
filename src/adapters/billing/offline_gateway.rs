//! Offline billing gateway.
//!
//! Used in demo environments and tests. No network calls: checkout resolves
//! immediately to a direct plan change and cancellation always succeeds.
//! Supports error injection and call tracking for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    BillingGateway, CheckoutOutcome, CheckoutRequest, GatewayError, PortalSession,
};

/// Billing gateway that resolves everything locally.
///
/// # Example
///
/// ```ignore
/// let gateway = OfflineBillingGateway::new();
/// gateway.set_method_error("cancel_subscription", GatewayError::network("down"));
/// ```
#[derive(Default)]
pub struct OfflineBillingGateway {
    inner: Arc<Mutex<OfflineState>>,
}

#[derive(Default)]
struct OfflineState {
    /// Error to return on next call to any method.
    next_error: Option<GatewayError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, GatewayError>,

    /// Track method calls for assertions.
    call_log: Vec<String>,
}

impl OfflineBillingGateway {
    /// Create a new offline gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    /// Methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().call_log.clone()
    }

    fn check(&self, method: &str) -> Result<(), GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(method.to_string());

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl BillingGateway for OfflineBillingGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, GatewayError> {
        self.check("create_checkout_session")?;
        Ok(CheckoutOutcome::DirectUpgrade { plan: request.plan })
    }

    async fn create_portal_session(
        &self,
        _customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, GatewayError> {
        self.check("create_portal_session")?;
        Ok(PortalSession { url: return_url.to_string() })
    }

    async fn cancel_subscription(&self, _subscription_id: &str) -> Result<(), GatewayError> {
        self.check("cancel_subscription")
    }

    async fn reactivate_subscription(&self, _subscription_id: &str) -> Result<(), GatewayError> {
        self.check("reactivate_subscription")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::BillingInterval;

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            plan: "pro".to_string(),
            interval: BillingInterval::Monthly,
            success_url: "https://app.test/ok".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
        }
    }

    #[tokio::test]
    async fn checkout_resolves_to_direct_upgrade() {
        let gateway = OfflineBillingGateway::new();
        let outcome = gateway
            .create_checkout_session(checkout_request())
            .await
            .unwrap();
        assert_eq!(outcome, CheckoutOutcome::DirectUpgrade { plan: "pro".to_string() });
    }

    #[tokio::test]
    async fn injected_error_is_returned_once() {
        let gateway = OfflineBillingGateway::new();
        gateway.set_error(GatewayError::network("simulated outage"));

        let first = gateway.cancel_subscription("sub_1").await;
        assert!(first.is_err());

        let second = gateway.cancel_subscription("sub_1").await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn method_error_only_hits_that_method() {
        let gateway = OfflineBillingGateway::new();
        gateway.set_method_error(
            "reactivate_subscription",
            GatewayError::provider("simulated failure"),
        );

        assert!(gateway.cancel_subscription("sub_1").await.is_ok());
        assert!(gateway.reactivate_subscription("sub_1").await.is_err());
    }

    #[tokio::test]
    async fn call_log_records_order() {
        let gateway = OfflineBillingGateway::new();
        let _ = gateway.create_checkout_session(checkout_request()).await;
        let _ = gateway.cancel_subscription("sub_1").await;

        assert_eq!(
            gateway.calls(),
            vec!["create_checkout_session", "cancel_subscription"]
        );
    }
}
