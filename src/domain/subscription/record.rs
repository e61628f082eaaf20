//! Subscription record aggregate.
//!
//! The record is the only mutable state in the engine. Every lifecycle
//! mutation is driven by an explicit external confirmation (a gateway
//! success, a backend refresh); the record never performs payment side
//! effects itself, and a failed gateway call leaves it untouched.
//!
//! # Design Decisions
//!
//! - **Wholesale plan replacement**: a checkout success replaces plan,
//!   status, and interval in one call so there is no window where both
//!   plans' entitlements apply.
//! - **Cancel is a flag, not a state**: `cancel_at_period_end` keeps the
//!   plan entitled until the period boundary.
//! - **Reset vs. cancel**: reset discards the record back to the lowest
//!   tier (sign-out); cancel preserves `current_period_end` so remaining
//!   access can still be computed.

use crate::domain::catalog::PlanCatalog;
use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, SubscriptionId, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::{BillingInterval, SubscriptionStatus};

const SECS_PER_DAY: i64 = 86_400;

/// A user's subscription record.
///
/// # Invariants
///
/// - `status == Trialing` implies `trial_end` is set
/// - `cancel_at_period_end` is only meaningful while `status == Active`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Unique identifier for this record.
    pub id: SubscriptionId,

    /// Current plan identifier (a catalog key).
    pub plan: String,

    /// Lifecycle status.
    pub status: SubscriptionStatus,

    /// Billing cadence.
    pub billing_interval: BillingInterval,

    /// End of the trial window, when trialing.
    pub trial_end: Option<Timestamp>,

    /// End of the current billing period.
    pub current_period_end: Option<Timestamp>,

    /// True when a cancellation is scheduled for the period boundary.
    pub cancel_at_period_end: bool,

    /// Payment processor customer id, once checkout has happened.
    pub stripe_customer_id: Option<String>,

    /// Payment processor subscription id, once checkout has happened.
    pub stripe_subscription_id: Option<String>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl SubscriptionRecord {
    /// Default record for a user observed with no existing subscription:
    /// the lowest catalog tier, active.
    pub fn free_default() -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            plan: PlanCatalog::builtin().lowest().id.clone(),
            status: SubscriptionStatus::Active,
            billing_interval: BillingInterval::Monthly,
            trial_end: None,
            current_period_end: None,
            cancel_at_period_end: false,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record for a trial of `plan` ending at `trial_end`.
    pub fn trialing(plan: impl Into<String>, trial_end: Timestamp) -> Self {
        Self {
            plan: plan.into(),
            status: SubscriptionStatus::Trialing,
            trial_end: Some(trial_end),
            ..Self::free_default()
        }
    }

    /// Checks the record's structural invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.status == SubscriptionStatus::Trialing && self.trial_end.is_none() {
            return Err(ValidationError::invalid_format(
                "trial_end",
                "trialing subscription requires a trial_end",
            ));
        }
        Ok(())
    }

    /// Applies a confirmed checkout for `plan`.
    ///
    /// This is a wholesale replacement of plan, status, and interval, never
    /// an incremental patch: the old plan's entitlements disappear in the
    /// same call that installs the new plan's.
    ///
    /// # Errors
    ///
    /// Returns an error if the status state machine rejects the transition.
    pub fn apply_checkout(
        &mut self,
        plan: impl Into<String>,
        interval: BillingInterval,
    ) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Active)?;
        self.plan = plan.into();
        self.billing_interval = interval;
        self.trial_end = None;
        self.cancel_at_period_end = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Schedules a cancellation at the period boundary.
    ///
    /// The plan and its limits are unchanged until the period actually ends;
    /// `current_period_end` is preserved for the remaining-access computation.
    ///
    /// # Errors
    ///
    /// Returns an error unless the subscription is active.
    pub fn schedule_cancel(&mut self) -> Result<(), DomainError> {
        if self.status != SubscriptionStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot schedule a cancel while {:?}", self.status),
            ));
        }
        self.cancel_at_period_end = true;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Clears a scheduled cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error unless the subscription is active.
    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        if self.status != SubscriptionStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot reactivate while {:?}", self.status),
            ));
        }
        self.cancel_at_period_end = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the record canceled, as reconciled by the backend once the
    /// period has actually ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the status state machine rejects the transition.
    pub fn mark_canceled(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Canceled)?;
        self.cancel_at_period_end = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Clears the record back to the free default. Used on sign-out.
    ///
    /// Unlike a cancel, reset discards history: trial, period end, and
    /// processor ids are all dropped. Idempotent.
    pub fn reset(&mut self) {
        self.plan = PlanCatalog::builtin().lowest().id.clone();
        self.status = SubscriptionStatus::Active;
        self.billing_interval = BillingInterval::Monthly;
        self.trial_end = None;
        self.current_period_end = None;
        self.cancel_at_period_end = false;
        self.stripe_customer_id = None;
        self.stripe_subscription_id = None;
        self.updated_at = Timestamp::now();
    }

    /// Returns true while the trial window is the source of entitlements.
    pub fn is_trialing(&self) -> bool {
        self.status == SubscriptionStatus::Trialing
    }

    /// Whole days left in the trial at `now`, rounded up, clamped to zero.
    ///
    /// A trial ending tomorrow at 00:01 reports 1 day even though less than
    /// 24 hours remain; a trial already past reports 0, never a negative.
    /// Display-only: reaching 0 does not itself change the status, expiry is
    /// reconciled server-side.
    pub fn trial_days_left_at(&self, now: Timestamp) -> u32 {
        let Some(trial_end) = self.trial_end else {
            return 0;
        };
        let secs = trial_end.duration_since(&now).num_seconds();
        if secs <= 0 {
            0
        } else {
            ((secs + SECS_PER_DAY - 1) / SECS_PER_DAY) as u32
        }
    }

    /// Whole days left in the trial, measured from the current moment.
    pub fn trial_days_left(&self) -> u32 {
        self.trial_days_left_at(Timestamp::now())
    }

    /// Returns true if the record grants its plan's entitlements at `now`.
    ///
    /// Canceled records keep access until their period end.
    pub fn has_access_at(&self, now: Timestamp) -> bool {
        if self.status.grants_access() {
            return true;
        }
        match self.current_period_end {
            Some(period_end) => now <= period_end,
            None => false,
        }
    }

    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition subscription from {:?} to {:?}", self.status, target),
            )
        })?;
        Ok(())
    }
}

impl Default for SubscriptionRecord {
    fn default() -> Self {
        Self::free_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semantic_fields(
        record: &SubscriptionRecord,
    ) -> (String, SubscriptionStatus, BillingInterval, Option<Timestamp>, Option<Timestamp>, bool)
    {
        (
            record.plan.clone(),
            record.status,
            record.billing_interval,
            record.trial_end,
            record.current_period_end,
            record.cancel_at_period_end,
        )
    }

    // Construction

    #[test]
    fn free_default_is_lowest_tier_active() {
        let record = SubscriptionRecord::free_default();
        assert_eq!(record.plan, "gratuit");
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert!(!record.cancel_at_period_end);
        assert!(record.trial_end.is_none());
    }

    #[test]
    fn trialing_constructor_sets_trial_end() {
        let end = Timestamp::now().add_days(14);
        let record = SubscriptionRecord::trialing("pro", end);
        assert_eq!(record.status, SubscriptionStatus::Trialing);
        assert_eq!(record.trial_end, Some(end));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn trialing_without_trial_end_fails_validation() {
        let mut record = SubscriptionRecord::free_default();
        record.status = SubscriptionStatus::Trialing;
        assert!(record.validate().is_err());
    }

    // Checkout

    #[test]
    fn checkout_mid_trial_replaces_plan_atomically() {
        let mut record = SubscriptionRecord::trialing("gratuit", Timestamp::now().add_days(7));

        record.apply_checkout("pro", BillingInterval::Monthly).unwrap();

        assert_eq!(record.status, SubscriptionStatus::Active);
        assert_eq!(record.plan, "pro");
        assert_eq!(record.billing_interval, BillingInterval::Monthly);
        assert!(record.trial_end.is_none());
        assert!(!record.cancel_at_period_end);
    }

    #[test]
    fn checkout_from_canceled_produces_active_record() {
        let mut record = SubscriptionRecord::free_default();
        record.mark_canceled().unwrap();

        record.apply_checkout("pro", BillingInterval::Yearly).unwrap();
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert_eq!(record.plan, "pro");
    }

    #[test]
    fn checkout_clears_scheduled_cancel() {
        let mut record = SubscriptionRecord::free_default();
        record.schedule_cancel().unwrap();

        record.apply_checkout("pro", BillingInterval::Monthly).unwrap();
        assert!(!record.cancel_at_period_end);
    }

    // Cancel / reactivate

    #[test]
    fn cancel_then_reactivate_preserves_plan_and_period() {
        let period_end = Timestamp::now().add_days(20);
        let mut record = SubscriptionRecord::free_default();
        record.apply_checkout("pro", BillingInterval::Monthly).unwrap();
        record.current_period_end = Some(period_end);

        record.schedule_cancel().unwrap();
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert!(record.cancel_at_period_end);
        assert_eq!(record.plan, "pro");
        assert_eq!(record.current_period_end, Some(period_end));

        record.reactivate().unwrap();
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert!(!record.cancel_at_period_end);
        assert_eq!(record.plan, "pro");
        assert_eq!(record.current_period_end, Some(period_end));
    }

    #[test]
    fn cancel_requires_active_status() {
        let mut record = SubscriptionRecord::trialing("pro", Timestamp::now().add_days(7));
        assert!(record.schedule_cancel().is_err());

        let mut canceled = SubscriptionRecord::free_default();
        canceled.mark_canceled().unwrap();
        assert!(canceled.schedule_cancel().is_err());
    }

    #[test]
    fn reactivate_requires_active_status() {
        let mut record = SubscriptionRecord::free_default();
        record.mark_canceled().unwrap();
        assert!(record.reactivate().is_err());
    }

    // Reset

    #[test]
    fn reset_is_idempotent() {
        let mut record = SubscriptionRecord::trialing("pro", Timestamp::now().add_days(7));
        record.current_period_end = Some(Timestamp::now().add_days(30));

        record.reset();
        let once = semantic_fields(&record);
        record.reset();
        let twice = semantic_fields(&record);

        assert_eq!(once, twice);
        assert_eq!(record.plan, "gratuit");
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert!(record.current_period_end.is_none());
    }

    #[test]
    fn reset_discards_processor_ids_but_cancel_does_not() {
        let mut record = SubscriptionRecord::free_default();
        record.apply_checkout("pro", BillingInterval::Monthly).unwrap();
        record.stripe_customer_id = Some("cus_123".to_string());
        record.current_period_end = Some(Timestamp::now().add_days(30));

        record.schedule_cancel().unwrap();
        assert!(record.stripe_customer_id.is_some());
        assert!(record.current_period_end.is_some());

        record.reset();
        assert!(record.stripe_customer_id.is_none());
        assert!(record.current_period_end.is_none());
    }

    // Trial day computation

    #[test]
    fn trial_days_left_is_zero_without_trial_end() {
        let record = SubscriptionRecord::free_default();
        assert_eq!(record.trial_days_left(), 0);
    }

    #[test]
    fn trial_ending_exactly_now_reports_zero() {
        let now = Timestamp::now();
        let record = SubscriptionRecord::trialing("pro", now);
        assert_eq!(record.trial_days_left_at(now), 0);
    }

    #[test]
    fn trial_ending_in_25_hours_reports_two_days() {
        let now = Timestamp::now();
        let record = SubscriptionRecord::trialing("pro", now.add_hours(25));
        assert_eq!(record.trial_days_left_at(now), 2);
    }

    #[test]
    fn trial_ending_in_under_24_hours_reports_one_day() {
        let now = Timestamp::now();
        let record = SubscriptionRecord::trialing("pro", now.add_hours(23));
        assert_eq!(record.trial_days_left_at(now), 1);
    }

    #[test]
    fn expired_trial_clamps_to_zero() {
        let now = Timestamp::now();
        let record = SubscriptionRecord::trialing("pro", now.add_days(-3));
        assert_eq!(record.trial_days_left_at(now), 0);
    }

    #[test]
    fn trial_days_left_never_increases_as_time_advances() {
        let now = Timestamp::now();
        let record = SubscriptionRecord::trialing("pro", now.add_days(5));

        let mut previous = u32::MAX;
        for hours in 0..=200 {
            let days = record.trial_days_left_at(now.add_hours(hours));
            assert!(days <= previous);
            previous = days;
        }
        assert_eq!(previous, 0);
    }

    // Access

    #[test]
    fn canceled_record_keeps_access_until_period_end() {
        let now = Timestamp::now();
        let mut record = SubscriptionRecord::free_default();
        record.current_period_end = Some(now.add_days(5));
        record.mark_canceled().unwrap();

        assert!(record.has_access_at(now));
        assert!(!record.has_access_at(now.add_days(6)));
    }

    #[test]
    fn canceled_record_without_period_end_has_no_access() {
        let mut record = SubscriptionRecord::free_default();
        record.mark_canceled().unwrap();
        assert!(!record.has_access_at(Timestamp::now()));
    }
}
