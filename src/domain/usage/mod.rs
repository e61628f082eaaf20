//! Current-period resource usage.
//!
//! A snapshot maps resource names to consumption counts within the current
//! calendar month. It is replaced wholesale on each refresh from the backend;
//! local increments are optimistic only and are overwritten by the next
//! refresh (last write wins, no merge).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from resource name to current-period consumption count.
///
/// An absent resource key means zero consumption, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageSnapshot(HashMap<String, u64>);

impl UsageSnapshot {
    /// Creates an empty snapshot (all resources at zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from resource/count pairs.
    pub fn from_counts<I, K>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        Self(counts.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Consumption for a resource; absent keys are zero.
    pub fn get(&self, resource: &str) -> u64 {
        self.0.get(resource).copied().unwrap_or(0)
    }

    /// Sets a resource counter.
    pub fn set(&mut self, resource: impl Into<String>, count: u64) {
        self.0.insert(resource.into(), count);
    }

    /// Optimistic local increment after a resource-creating action succeeds.
    ///
    /// This never writes through to the backend; the server-authoritative
    /// counter is incremented separately and reconciled by the next refresh.
    pub fn increment_local(&mut self, resource: &str, amount: u64) {
        *self.0.entry(resource.to_string()).or_insert(0) += amount;
    }

    /// Iterates over the recorded counters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns true if no counters have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
