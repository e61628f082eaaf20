//! Live billing gateway adapter.
//!
//! Implements `BillingGateway` against the backend's billing endpoints. The
//! backend holds the Stripe secret and performs the actual provider calls;
//! this adapter only speaks authenticated JSON to it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::ports::{
    BillingGateway, CheckoutOutcome, CheckoutRequest, GatewayError, PortalSession,
};

/// Configuration for the live gateway.
#[derive(Debug, Clone)]
pub struct LiveGatewayConfig {
    /// Base URL of the backend billing endpoints.
    pub base_url: String,

    /// API key sent as a bearer token.
    pub api_key: String,
}

/// Billing gateway backed by real backend billing endpoints.
pub struct LiveBillingGateway {
    config: LiveGatewayConfig,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct CheckoutSessionResponse {
    url: String,
}

#[derive(Deserialize)]
struct PortalSessionResponse {
    url: String,
}

impl LiveBillingGateway {
    /// Create a new live gateway with the given configuration.
    pub fn new(config: LiveGatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .http_client
            .post(self.endpoint(path))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::authentication("billing endpoint rejected API key"));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::not_found(path));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(endpoint = path, status = %status, error = %error_text, "billing endpoint call failed");
            return Err(GatewayError::provider(format!(
                "billing endpoint {} failed ({}): {}",
                path, status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl BillingGateway for LiveBillingGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, GatewayError> {
        let response = self
            .post_json(
                "create-checkout-session",
                json!({
                    "plan": request.plan,
                    "interval": request.interval,
                    "success_url": request.success_url,
                    "cancel_url": request.cancel_url,
                }),
            )
            .await?;

        let session: CheckoutSessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("failed to parse checkout response: {}", e)))?;

        Ok(CheckoutOutcome::Redirect { url: session.url })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, GatewayError> {
        let response = self
            .post_json(
                "create-portal-session",
                json!({
                    "customer_id": customer_id,
                    "return_url": return_url,
                }),
            )
            .await?;

        let session: PortalSessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("failed to parse portal response: {}", e)))?;

        Ok(PortalSession { url: session.url })
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), GatewayError> {
        self.post_json(
            "cancel-subscription",
            json!({ "subscription_id": subscription_id }),
        )
        .await?;
        Ok(())
    }

    async fn reactivate_subscription(&self, subscription_id: &str) -> Result<(), GatewayError> {
        self.post_json(
            "reactivate-subscription",
            json!({ "subscription_id": subscription_id }),
        )
        .await?;
        Ok(())
    }
}
