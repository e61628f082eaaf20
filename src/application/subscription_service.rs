//! SubscriptionService - orchestrates the entitlement context lifecycle.
//!
//! The service owns the session's [`EntitlementContext`] and coordinates it
//! with the billing gateway and the subscription backend. Domain mutations
//! only happen after a collaborator confirms: a failed gateway call leaves
//! the record untouched, and a failed usage refresh keeps serving the last
//! known snapshot rather than zeroing counters.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementContext;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::subscription::BillingInterval;
use crate::ports::{
    BillingGateway, CheckoutOutcome, CheckoutRequest, PortalSession, SubscriptionBackend,
};

/// Default reconciliation cadence when none is configured.
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;

/// Orchestrates subscription state for one session.
pub struct SubscriptionService {
    gateway: Arc<dyn BillingGateway>,
    backend: Arc<dyn SubscriptionBackend>,
    context: EntitlementContext,
    last_synced: Option<Timestamp>,
    reconcile_interval_secs: u64,
}

impl SubscriptionService {
    /// Create a service starting from the free default context.
    ///
    /// `reconcile_interval_secs` sets how stale the local record may get
    /// before [`needs_reconcile`](Self::needs_reconcile) reports true.
    pub fn new(
        gateway: Arc<dyn BillingGateway>,
        backend: Arc<dyn SubscriptionBackend>,
        reconcile_interval_secs: u64,
    ) -> Self {
        Self {
            gateway,
            backend,
            context: EntitlementContext::free_default(),
            last_synced: None,
            reconcile_interval_secs,
        }
    }

    /// The current entitlement context.
    pub fn context(&self) -> &EntitlementContext {
        &self.context
    }

    /// Load subscription record and usage counters from the backend.
    ///
    /// Replaces the whole context. Callers run this at session start and on
    /// each reconciliation tick.
    pub async fn load(&mut self) -> Result<(), DomainError> {
        let record = self.backend.fetch_subscription().await?;
        let usage = self.backend.fetch_usage().await?;

        tracing::info!(plan = %record.plan, status = ?record.status, "subscription loaded");
        self.context = EntitlementContext::new(record, usage);
        self.last_synced = Some(Timestamp::now());
        Ok(())
    }

    /// Refresh usage counters, keeping the last snapshot on failure.
    ///
    /// Usage staleness only ever under-counts briefly; serving stale
    /// counters beats zeroing them and wrongly re-opening gates.
    pub async fn refresh_usage(&mut self) {
        match self.backend.fetch_usage().await {
            Ok(usage) => {
                self.context.usage = usage;
                self.last_synced = Some(Timestamp::now());
            }
            Err(e) => {
                tracing::warn!(error = %e, "usage refresh failed, keeping last snapshot");
            }
        }
    }

    /// Record one more unit of `resource` created locally.
    ///
    /// The local counter bumps immediately so the very next gate check sees
    /// it; the backend increment then reconciles to the authoritative count.
    /// A failed report is logged and left for the next reconciliation.
    pub async fn record_creation(&mut self, resource: &str) {
        self.context.usage.increment_local(resource, 1);

        match self.backend.increment_usage(resource).await {
            Ok(count) => self.context.usage.set(resource, count),
            Err(e) => {
                tracing::warn!(resource, error = %e, "usage report failed, local count retained");
            }
        }
    }

    /// Start an upgrade to `plan` billed at `interval`.
    ///
    /// A `Redirect` outcome leaves the record unchanged until the provider
    /// confirms via the backend; a `DirectUpgrade` applies immediately.
    pub async fn upgrade(
        &mut self,
        plan: &str,
        interval: BillingInterval,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutOutcome, DomainError> {
        let outcome = self
            .gateway
            .create_checkout_session(CheckoutRequest {
                plan: plan.to_string(),
                interval,
                success_url: success_url.to_string(),
                cancel_url: cancel_url.to_string(),
            })
            .await?;

        if let CheckoutOutcome::DirectUpgrade { plan } = &outcome {
            self.context.subscription.apply_checkout(plan.clone(), interval)?;
            tracing::info!(plan = %plan, interval = %interval, "direct upgrade applied");
        }

        Ok(outcome)
    }

    /// Open a billing portal session.
    pub async fn billing_portal(&self, return_url: &str) -> Result<PortalSession, DomainError> {
        let customer_id = self
            .context
            .subscription
            .stripe_customer_id
            .as_deref()
            .unwrap_or_default();
        Ok(self.gateway.create_portal_session(customer_id, return_url).await?)
    }

    /// Schedule a cancellation at the period boundary.
    ///
    /// The record keeps its plan and period end; only the flag flips, and
    /// only once the gateway has accepted the request.
    pub async fn cancel(&mut self) -> Result<(), DomainError> {
        let subscription_id = self.provider_subscription_id();
        self.gateway.cancel_subscription(&subscription_id).await?;
        self.context.subscription.schedule_cancel()?;
        tracing::info!(plan = %self.context.subscription.plan, "cancellation scheduled");
        Ok(())
    }

    /// Withdraw a scheduled cancellation.
    pub async fn reactivate(&mut self) -> Result<(), DomainError> {
        let subscription_id = self.provider_subscription_id();
        self.gateway.reactivate_subscription(&subscription_id).await?;
        self.context.subscription.reactivate()?;
        tracing::info!(plan = %self.context.subscription.plan, "cancellation withdrawn");
        Ok(())
    }

    /// Discard local state back to the free default. Used on sign-out.
    pub fn reset(&mut self) {
        self.context = EntitlementContext::free_default();
        self.last_synced = None;
    }

    /// Whether the local record is stale enough to reload from the backend.
    pub fn needs_reconcile(&self, now: Timestamp) -> bool {
        match self.last_synced {
            None => true,
            Some(synced) => {
                now.duration_since(&synced).num_seconds() >= self.reconcile_interval_secs as i64
            }
        }
    }

    fn provider_subscription_id(&self) -> String {
        self.context
            .subscription
            .stripe_subscription_id
            .clone()
            .unwrap_or_else(|| self.context.subscription.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySubscriptionBackend, OfflineBillingGateway};
    use crate::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
    use crate::domain::usage::UsageSnapshot;
    use crate::ports::{BackendError, GatewayError};

    fn service_with(
        gateway: OfflineBillingGateway,
        backend: InMemorySubscriptionBackend,
    ) -> SubscriptionService {
        SubscriptionService::new(Arc::new(gateway), Arc::new(backend), 300)
    }

    #[tokio::test]
    async fn load_builds_context_from_backend_state() {
        let backend = InMemorySubscriptionBackend::new();
        let mut record = SubscriptionRecord::free_default();
        record.plan = "pro".to_string();
        backend.set_record(record);
        backend.set_usage(UsageSnapshot::from_counts([("devis", 7)]));

        let mut service = service_with(OfflineBillingGateway::new(), backend);
        service.load().await.unwrap();

        assert_eq!(service.context().plan_id(), "pro");
        assert_eq!(service.context().usage.get("devis"), 7);
    }

    #[tokio::test]
    async fn refresh_usage_keeps_stale_snapshot_on_failure() {
        let backend = Arc::new(InMemorySubscriptionBackend::new());
        backend.set_usage(UsageSnapshot::from_counts([("devis", 2)]));

        let mut service = SubscriptionService::new(
            Arc::new(OfflineBillingGateway::new()),
            backend.clone(),
            300,
        );
        service.load().await.unwrap();
        assert_eq!(service.context().usage.get("devis"), 2);

        backend.set_method_error(
            "fetch_usage",
            BackendError::Network("simulated outage".into()),
        );
        service.refresh_usage().await;

        // Outage must not zero the counters.
        assert_eq!(service.context().usage.get("devis"), 2);

        backend.clear_errors();
        backend.set_usage(UsageSnapshot::from_counts([("devis", 5)]));
        service.refresh_usage().await;
        assert_eq!(service.context().usage.get("devis"), 5);
    }

    #[tokio::test]
    async fn record_creation_bumps_locally_and_adopts_server_count() {
        let backend = InMemorySubscriptionBackend::new();
        backend.set_usage(UsageSnapshot::from_counts([("devis", 2)]));

        let mut service = service_with(OfflineBillingGateway::new(), backend);
        service.load().await.unwrap();

        service.record_creation("devis").await;
        assert_eq!(service.context().usage.get("devis"), 3);
    }

    #[tokio::test]
    async fn record_creation_keeps_local_bump_when_report_fails() {
        let backend = Arc::new(InMemorySubscriptionBackend::new());
        let mut service = SubscriptionService::new(
            Arc::new(OfflineBillingGateway::new()),
            backend.clone(),
            300,
        );
        service.load().await.unwrap();

        backend.set_method_error(
            "increment_usage",
            BackendError::Rejected { status: 503, message: "unavailable".into() },
        );
        service.record_creation("devis").await;

        // Local count holds until the next successful reconciliation.
        assert_eq!(service.context().usage.get("devis"), 1);
    }

    #[tokio::test]
    async fn direct_upgrade_applies_immediately() {
        let mut service =
            service_with(OfflineBillingGateway::new(), InMemorySubscriptionBackend::new());
        service.load().await.unwrap();
        assert!(!service.context().has_feature("signatures"));

        let outcome = service
            .upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
            .await
            .unwrap();

        assert_eq!(outcome, CheckoutOutcome::DirectUpgrade { plan: "pro".to_string() });
        assert_eq!(service.context().plan_id(), "pro");
        assert!(service.context().has_feature("signatures"));
        assert_eq!(service.context().subscription.status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn failed_cancel_leaves_record_untouched() {
        let gateway = OfflineBillingGateway::new();
        gateway.set_method_error(
            "cancel_subscription",
            GatewayError::network("simulated outage"),
        );

        let mut service = service_with(gateway, InMemorySubscriptionBackend::new());
        service.load().await.unwrap();
        service
            .upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
            .await
            .unwrap();

        assert!(service.cancel().await.is_err());
        assert!(!service.context().subscription.cancel_at_period_end);
    }

    #[tokio::test]
    async fn cancel_then_reactivate_round_trips_the_flag() {
        let mut service =
            service_with(OfflineBillingGateway::new(), InMemorySubscriptionBackend::new());
        service.load().await.unwrap();
        service
            .upgrade("pro", BillingInterval::Yearly, "https://app.test/ok", "https://app.test/no")
            .await
            .unwrap();

        service.cancel().await.unwrap();
        assert!(service.context().subscription.cancel_at_period_end);
        assert_eq!(service.context().plan_id(), "pro");

        service.reactivate().await.unwrap();
        assert!(!service.context().subscription.cancel_at_period_end);
        assert_eq!(service.context().plan_id(), "pro");
    }

    #[tokio::test]
    async fn reset_returns_to_free_default() {
        let mut service =
            service_with(OfflineBillingGateway::new(), InMemorySubscriptionBackend::new());
        service.load().await.unwrap();
        service
            .upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
            .await
            .unwrap();

        service.reset();
        assert_eq!(service.context().plan_id(), "gratuit");
        assert!(service.context().usage.is_empty());
        assert!(service.needs_reconcile(Timestamp::now()));
    }

    #[tokio::test]
    async fn reconcile_cadence_respects_configured_interval() {
        let mut service =
            service_with(OfflineBillingGateway::new(), InMemorySubscriptionBackend::new());
        assert!(service.needs_reconcile(Timestamp::now()));

        service.load().await.unwrap();
        let now = Timestamp::now();
        assert!(!service.needs_reconcile(now));
        assert!(service.needs_reconcile(now.add_hours(1)));
    }
}
