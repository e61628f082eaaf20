//! Subscription backend adapters.
//!
//! - `HttpSubscriptionBackend` - talks to the backend's subscription and
//!   usage endpoints over authenticated JSON
//! - `InMemorySubscriptionBackend` - in-process store for demo environments
//!   and tests, with error injection

mod http_backend;
mod in_memory;

pub use http_backend::{HttpBackendConfig, HttpSubscriptionBackend};
pub use in_memory::InMemorySubscriptionBackend;
