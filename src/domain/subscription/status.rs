//! Subscription status state machine.
//!
//! Three states cover the lifecycle: `Trialing`, `Active`, `Canceled`.
//! "Cancellation scheduled" is deliberately not a state: it is the
//! `cancel_at_period_end` flag on the record, because the plan remains fully
//! entitled until the period boundary.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Current state of a subscription in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Time-boxed trial of a higher tier. `trial_end` must be set.
    Trialing,

    /// Paid (or free-tier) subscription in good standing.
    Active,

    /// The current subscription instance has ended. A new checkout creates
    /// a fresh record rather than transitioning out of this state in place.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns true if this status grants the plan's entitlements.
    ///
    /// Canceled records may retain access until the period end; that check
    /// needs the record's `current_period_end` and lives on the aggregate.
    pub fn grants_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Trialing | SubscriptionStatus::Active)
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIALING
            (Trialing, Active)       // checkout success or trial expiry reconciled
                | (Trialing, Canceled)
            // From ACTIVE
                | (Active, Active)   // renewal, plan change, cancel flag toggles
                | (Active, Canceled) // period ended after a scheduled cancel
            // From CANCELED
                | (Canceled, Active) // fresh checkout replaces the record
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trialing => vec![Active, Canceled],
            Active => vec![Active, Canceled],
            Canceled => vec![Active],
        }
    }
}
