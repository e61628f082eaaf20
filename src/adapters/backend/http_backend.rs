//! HTTP subscription backend adapter.
//!
//! Reads subscription records and usage counters from the backend API.
//! A missing subscription record is not an error: new accounts simply have
//! none yet, so the fetch resolves to the free default.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::subscription::SubscriptionRecord;
use crate::domain::usage::UsageSnapshot;
use crate::ports::{BackendError, SubscriptionBackend};

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the backend API.
    pub base_url: String,

    /// API key sent as a bearer token.
    pub api_key: String,
}

/// Subscription backend over authenticated JSON endpoints.
pub struct HttpSubscriptionBackend {
    config: HttpBackendConfig,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct IncrementResponse {
    count: u64,
}

impl HttpSubscriptionBackend {
    /// Create a new HTTP backend with the given configuration.
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SubscriptionBackend for HttpSubscriptionBackend {
    async fn fetch_subscription(&self) -> Result<SubscriptionRecord, BackendError> {
        let response = self
            .http_client
            .get(self.endpoint("subscription"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        // No record yet: the account is on the free plan.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(SubscriptionRecord::free_default());
        }

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    async fn fetch_usage(&self) -> Result<UsageSnapshot, BackendError> {
        let response = self
            .http_client
            .get(self.endpoint("usage"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(UsageSnapshot::new());
        }

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    async fn increment_usage(&self, resource: &str) -> Result<u64, BackendError> {
        let response = self
            .http_client
            .post(self.endpoint("usage/increment"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "resource": resource }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let body: IncrementResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        Ok(body.count)
    }
}
