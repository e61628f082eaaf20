//! Plan definition.
//!
//! A plan bundles resource limits, feature flags, list prices, and the
//! display metadata the pricing page renders. Money is stored as integer
//! cents, never floats.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel limit value meaning "unlimited".
///
/// A limit of `0` means the resource is unavailable on the plan; an absent
/// resource key is treated as `0`.
pub const UNLIMITED: i64 = -1;

/// Marketing row shown on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLabel {
    /// Display text, e.g. "Devis & factures illimités".
    pub name: String,
    /// Whether the plan includes it (rendered as check vs. cross).
    pub included: bool,
}

impl FeatureLabel {
    pub fn included(name: impl Into<String>) -> Self {
        Self { name: name.into(), included: true }
    }

    pub fn excluded(name: impl Into<String>) -> Self {
        Self { name: name.into(), included: false }
    }
}

/// A subscription plan definition.
///
/// # Invariants
///
/// - `id` is unique and stable across catalog versions
/// - Tiers are monotonically more permissive: no feature is removed going up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Stable identifier, e.g. "gratuit" or "pro".
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short marketing description.
    pub description: String,

    /// Target audience line.
    pub target: String,

    /// Monthly list price in cents.
    pub price_monthly_cents: u32,

    /// Yearly list price in cents.
    pub price_yearly_cents: u32,

    /// Per-resource limits. `-1` = unlimited, `0` = unavailable.
    pub limits: HashMap<String, i64>,

    /// Feature keys unlocked by this plan.
    pub features: Vec<String>,

    /// Marketing rows for the pricing page.
    pub feature_labels: Vec<FeatureLabel>,

    /// Optional badge, e.g. "RECOMMANDÉ".
    pub badge: Option<String>,

    /// Accent color (hex).
    pub color: String,

    /// Support channel, e.g. "email" or "prioritaire".
    pub support: String,
}

impl Plan {
    /// Limit for a resource. Absent keys are `0` (unavailable).
    pub fn limit(&self, resource: &str) -> i64 {
        self.limits.get(resource).copied().unwrap_or(0)
    }

    /// Membership test on the plan's feature set.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Returns true if the plan is free of charge.
    pub fn is_free(&self) -> bool {
        self.price_monthly_cents == 0 && self.price_yearly_cents == 0
    }
}
