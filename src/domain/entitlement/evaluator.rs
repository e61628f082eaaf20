//! Pure entitlement checks.
//!
//! All functions here take the plan and usage snapshot as plain values and
//! have no side effects, so they can run on any hot path without locking.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Plan, UNLIMITED};
use crate::domain::usage::UsageSnapshot;

/// Result of a resource limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCheck {
    /// Whether one more unit of the resource may be created.
    pub allowed: bool,

    /// Current-period consumption.
    pub current: u64,

    /// The plan's limit, `-1` meaning unlimited.
    pub limit: i64,

    /// Consumption as a percentage of the limit, clamped to 0..=100.
    /// Always 0 for unlimited resources.
    pub percent: u8,
}

/// Membership test on the plan's feature set.
pub fn has_feature(plan: &Plan, feature: &str) -> bool {
    plan.has_feature(feature)
}

/// Checks a resource against the plan's limit.
///
/// Allowance is strictly-less-than: reaching the limit blocks the next
/// creation, it does not retroactively invalidate existing resources. Only
/// `UNLIMITED` is a sentinel; any other non-positive limit (a `0`, or a
/// malformed negative from an external catalog source) blocks the resource
/// and reports 100 percent.
pub fn check_limit(plan: &Plan, usage: &UsageSnapshot, resource: &str) -> LimitCheck {
    let limit = plan.limit(resource);
    let current = usage.get(resource);

    if limit == UNLIMITED {
        return LimitCheck { allowed: true, current, limit: UNLIMITED, percent: 0 };
    }

    let allowed = limit > 0 && current < limit as u64;
    let percent = if limit > 0 {
        let ratio = (current as f64 / limit as f64) * 100.0;
        (ratio.round() as u64).min(100) as u8
    } else {
        100
    };

    LimitCheck { allowed, current, limit, percent }
}

/// Shorthand: can one more unit of `resource` be created?
pub fn can_create(plan: &Plan, usage: &UsageSnapshot, resource: &str) -> bool {
    let limit = plan.limit(resource);
    limit == UNLIMITED || (limit > 0 && usage.get(resource) < limit as u64)
}
