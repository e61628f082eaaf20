//! Explicit entitlement context.
//!
//! The context bundles the subscription record and usage snapshot a request
//! or session operates on, plus the catalog to read plans from. It replaces
//! a process-wide store: the caller constructs one per session and refreshes
//! it, while evaluator calls stay pure reads.

use crate::domain::catalog::{Plan, PlanCatalog};
use crate::domain::subscription::SubscriptionRecord;
use crate::domain::upgrade::{page_required_feature, select_context};
use crate::domain::usage::UsageSnapshot;

use super::{can_create, check_limit, has_feature, Gate, LimitCheck};

/// Plan + usage + subscription, as seen by one session.
#[derive(Debug, Clone)]
pub struct EntitlementContext {
    /// The session's subscription record.
    pub subscription: SubscriptionRecord,

    /// Current-period usage snapshot.
    pub usage: UsageSnapshot,

    catalog: &'static PlanCatalog,
}

impl EntitlementContext {
    /// Builds a context over the built-in catalog.
    pub fn new(subscription: SubscriptionRecord, usage: UsageSnapshot) -> Self {
        Self::with_catalog(PlanCatalog::builtin(), subscription, usage)
    }

    /// Builds a context over a specific catalog.
    pub fn with_catalog(
        catalog: &'static PlanCatalog,
        subscription: SubscriptionRecord,
        usage: UsageSnapshot,
    ) -> Self {
        Self { subscription, usage, catalog }
    }

    /// A fresh context on the free default plan with empty usage.
    pub fn free_default() -> Self {
        Self::new(SubscriptionRecord::free_default(), UsageSnapshot::new())
    }

    /// The catalog this context reads plans from.
    pub fn catalog(&self) -> &'static PlanCatalog {
        self.catalog
    }

    /// The current plan identifier.
    pub fn plan_id(&self) -> &str {
        &self.subscription.plan
    }

    /// The current plan definition (fail-closed for unknown identifiers).
    pub fn plan(&self) -> &Plan {
        self.catalog.get(&self.subscription.plan)
    }

    /// Does the current plan include `feature`?
    pub fn has_feature(&self, feature: &str) -> bool {
        has_feature(self.plan(), feature)
    }

    /// Checks `resource` against the current plan's limit.
    pub fn check_limit(&self, resource: &str) -> LimitCheck {
        check_limit(self.plan(), &self.usage, resource)
    }

    /// Shorthand: can one more unit of `resource` be created?
    pub fn can_create(&self, resource: &str) -> bool {
        can_create(self.plan(), &self.usage, resource)
    }

    /// Is the session on the lowest (free) tier?
    pub fn is_free(&self) -> bool {
        self.plan().id == self.catalog.lowest().id
    }

    /// Is a trial currently the source of entitlements?
    pub fn is_trial(&self) -> bool {
        self.subscription.is_trialing()
    }

    /// Whole days left in the trial, clamped to zero.
    pub fn trial_days_left(&self) -> u32 {
        self.subscription.trial_days_left()
    }

    /// Is the current plan at least as good as `plan_id`?
    pub fn is_at_least(&self, plan_id: &str) -> bool {
        self.catalog.is_at_least(self.plan_id(), plan_id)
    }

    /// Runs `action` if the plan includes `feature`; otherwise returns the
    /// upgrade prompt for it.
    pub fn require_feature<T>(&self, feature: &str, action: impl FnOnce() -> T) -> Gate<T> {
        if self.has_feature(feature) {
            Gate::Allowed(action())
        } else {
            Gate::Denied(select_context(feature, self.plan_id(), self.catalog))
        }
    }

    /// Runs `action` unless `page_id` is gated behind a feature the plan
    /// lacks. Pages absent from the gate table are always allowed.
    pub fn require_page<T>(&self, page_id: &str, action: impl FnOnce() -> T) -> Gate<T> {
        match page_required_feature(page_id) {
            Some(feature) => self.require_feature(feature, action),
            None => Gate::Allowed(action()),
        }
    }

    /// Runs `action` if the resource limit allows one more creation;
    /// otherwise returns the upgrade prompt for it.
    pub fn require_limit<T>(&self, resource: &str, action: impl FnOnce() -> T) -> Gate<T> {
        if self.can_create(resource) {
            Gate::Allowed(action())
        } else {
            Gate::Denied(select_context(resource, self.plan_id(), self.catalog))
        }
    }
}
