//! In-memory subscription backend.
//!
//! Keeps the subscription record and usage counters in process memory.
//! Used by demo environments and tests; supports error injection in the
//! same style as the offline billing gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::subscription::SubscriptionRecord;
use crate::domain::usage::UsageSnapshot;
use crate::ports::{BackendError, SubscriptionBackend};

/// Subscription backend backed by process memory.
#[derive(Default)]
pub struct InMemorySubscriptionBackend {
    inner: Arc<Mutex<MemoryState>>,
}

struct MemoryState {
    record: SubscriptionRecord,
    usage: UsageSnapshot,
    next_error: Option<BackendError>,
    method_errors: HashMap<String, BackendError>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            record: SubscriptionRecord::free_default(),
            usage: UsageSnapshot::new(),
            next_error: None,
            method_errors: HashMap::new(),
        }
    }
}

impl InMemorySubscriptionBackend {
    /// Create a backend holding the free default record and empty usage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend seeded with a record and usage counters.
    pub fn with_state(record: SubscriptionRecord, usage: UsageSnapshot) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.inner.lock().unwrap();
            state.record = record;
            state.usage = usage;
        }
        backend
    }

    /// Replace the stored subscription record.
    pub fn set_record(&self, record: SubscriptionRecord) {
        self.inner.lock().unwrap().record = record;
    }

    /// Replace the stored usage counters.
    pub fn set_usage(&self, usage: UsageSnapshot) {
        self.inner.lock().unwrap().usage = usage;
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: BackendError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: BackendError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    fn check(state: &mut MemoryState, method: &str) -> Result<(), BackendError> {
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionBackend for InMemorySubscriptionBackend {
    async fn fetch_subscription(&self) -> Result<SubscriptionRecord, BackendError> {
        let mut state = self.inner.lock().unwrap();
        Self::check(&mut state, "fetch_subscription")?;
        Ok(state.record.clone())
    }

    async fn fetch_usage(&self) -> Result<UsageSnapshot, BackendError> {
        let mut state = self.inner.lock().unwrap();
        Self::check(&mut state, "fetch_usage")?;
        Ok(state.usage.clone())
    }

    async fn increment_usage(&self, resource: &str) -> Result<u64, BackendError> {
        let mut state = self.inner.lock().unwrap();
        Self::check(&mut state, "increment_usage")?;
        let count = state.usage.get(resource) + 1;
        state.usage.set(resource, count);
        Ok(count)
    }
}
