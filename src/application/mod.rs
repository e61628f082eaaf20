//! Application layer - orchestration between the domain and the ports.
//!
//! The service here owns the session's entitlement context and coordinates
//! the billing gateway and subscription backend around it.

mod subscription_service;

pub use subscription_service::{SubscriptionService, DEFAULT_RECONCILE_INTERVAL_SECS};
