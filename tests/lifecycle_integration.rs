//! Integration tests for the subscription lifecycle.
//!
//! These tests drive the full flow through the application service:
//! 1. Load subscription and usage from the backend
//! 2. Gate checks against the entitlement context
//! 3. Checkout, cancellation, and reactivation through the gateway
//! 4. Usage reporting and reconciliation
//!
//! Uses the offline gateway and in-memory backend, so no external services
//! are required.

use std::sync::{Arc, Once};

use chantierpro_core::adapters::{InMemorySubscriptionBackend, OfflineBillingGateway};
use chantierpro_core::application::SubscriptionService;
use chantierpro_core::domain::entitlement::Gate;
use chantierpro_core::domain::foundation::Timestamp;
use chantierpro_core::domain::subscription::{
    BillingInterval, SubscriptionRecord, SubscriptionStatus,
};
use chantierpro_core::domain::usage::UsageSnapshot;
use chantierpro_core::ports::{BackendError, CheckoutOutcome};

static TRACING: Once = Once::new();

/// Installs a test subscriber so service log output is visible under
/// `RUST_LOG` when debugging failures.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

fn service(
    gateway: Arc<OfflineBillingGateway>,
    backend: Arc<InMemorySubscriptionBackend>,
) -> SubscriptionService {
    init_tracing();
    SubscriptionService::new(gateway, backend, 300)
}

#[tokio::test]
async fn free_account_hits_limits_and_gets_contextual_prompt() {
    let backend = Arc::new(InMemorySubscriptionBackend::new());
    backend.set_usage(UsageSnapshot::from_counts([("chantiers", 1)]));

    let mut svc = service(Arc::new(OfflineBillingGateway::new()), backend);
    svc.load().await.unwrap();

    let check = svc.context().check_limit("chantiers");
    assert!(!check.allowed);
    assert_eq!(check.percent, 100);

    match svc.context().require_limit("chantiers", || ()) {
        Gate::Denied(prompt) => {
            assert_eq!(prompt.recommended_plan, "pro");
        }
        Gate::Allowed(_) => panic!("limit gate should deny at the limit"),
    }
}

#[tokio::test]
async fn checkout_mid_trial_switches_plans_atomically() {
    let backend = Arc::new(InMemorySubscriptionBackend::new());
    backend.set_record(SubscriptionRecord::trialing(
        "gratuit",
        Timestamp::now().add_days(7),
    ));

    let mut svc = service(Arc::new(OfflineBillingGateway::new()), backend);
    svc.load().await.unwrap();
    assert!(svc.context().is_trial());
    assert!(!svc.context().has_feature("tresorerie"));

    let outcome = svc
        .upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
        .await
        .unwrap();
    assert_eq!(outcome, CheckoutOutcome::DirectUpgrade { plan: "pro".to_string() });

    // The trial is gone and the new plan's entitlements apply, in one step.
    assert!(!svc.context().is_trial());
    assert_eq!(svc.context().subscription.status, SubscriptionStatus::Active);
    assert_eq!(svc.context().subscription.trial_end, None);
    assert!(svc.context().has_feature("tresorerie"));
    assert_eq!(svc.context().check_limit("devis").limit, -1);
}

#[tokio::test]
async fn cancel_keeps_entitlements_until_reactivated() {
    let mut svc = service(
        Arc::new(OfflineBillingGateway::new()),
        Arc::new(InMemorySubscriptionBackend::new()),
    );
    svc.load().await.unwrap();
    svc.upgrade("pro", BillingInterval::Yearly, "https://app.test/ok", "https://app.test/no")
        .await
        .unwrap();

    svc.cancel().await.unwrap();
    assert!(svc.context().subscription.cancel_at_period_end);
    // Still entitled for the rest of the period.
    assert!(svc.context().has_feature("signatures"));
    assert_eq!(svc.context().plan_id(), "pro");

    svc.reactivate().await.unwrap();
    assert!(!svc.context().subscription.cancel_at_period_end);
    assert_eq!(svc.context().subscription.billing_interval, BillingInterval::Yearly);
}

#[tokio::test]
async fn usage_outage_retains_stale_counters() {
    let backend = Arc::new(InMemorySubscriptionBackend::new());
    backend.set_usage(UsageSnapshot::from_counts([("devis", 2)]));

    let mut svc = service(Arc::new(OfflineBillingGateway::new()), backend.clone());
    svc.load().await.unwrap();

    backend.set_method_error(
        "fetch_usage",
        BackendError::Network("simulated outage".into()),
    );
    svc.refresh_usage().await;

    // Counters survive; the gate still sees 2/3 devis used.
    let check = svc.context().check_limit("devis");
    assert!(check.allowed);
    assert_eq!(check.current, 2);

    backend.clear_errors();
    svc.record_creation("devis").await;
    let check = svc.context().check_limit("devis");
    assert!(!check.allowed);
    assert_eq!(check.current, 3);
}

#[tokio::test]
async fn creation_flow_blocks_exactly_at_the_limit() {
    let backend = Arc::new(InMemorySubscriptionBackend::new());
    let mut svc = service(Arc::new(OfflineBillingGateway::new()), backend);
    svc.load().await.unwrap();

    // Free plan allows 3 devis.
    for _ in 0..3 {
        assert!(svc.context().can_create("devis"));
        svc.record_creation("devis").await;
    }
    assert!(!svc.context().can_create("devis"));

    match svc.context().require_limit("devis", || ()) {
        Gate::Denied(prompt) => assert_eq!(prompt.title, "Limite de devis atteinte"),
        Gate::Allowed(_) => panic!("fourth devis must be denied"),
    }
}

#[tokio::test]
async fn sign_out_resets_to_free_default() {
    let mut svc = service(
        Arc::new(OfflineBillingGateway::new()),
        Arc::new(InMemorySubscriptionBackend::new()),
    );
    svc.load().await.unwrap();
    svc.upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
        .await
        .unwrap();
    svc.record_creation("devis").await;

    svc.reset();

    assert_eq!(svc.context().plan_id(), "gratuit");
    assert!(svc.context().usage.is_empty());
    assert!(!svc.context().has_feature("signatures"));
    assert!(svc.needs_reconcile(Timestamp::now()));
}

#[tokio::test]
async fn gateway_failure_during_checkout_changes_nothing() {
    let gateway = Arc::new(OfflineBillingGateway::new());
    gateway.set_method_error(
        "create_checkout_session",
        chantierpro_core::ports::GatewayError::network("simulated outage"),
    );

    let mut svc = service(gateway, Arc::new(InMemorySubscriptionBackend::new()));
    svc.load().await.unwrap();

    let result = svc
        .upgrade("pro", BillingInterval::Monthly, "https://app.test/ok", "https://app.test/no")
        .await;
    assert!(result.is_err());

    assert_eq!(svc.context().plan_id(), "gratuit");
    assert_eq!(svc.context().subscription.status, SubscriptionStatus::Active);
}
