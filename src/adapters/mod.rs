//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `billing` - Billing gateway implementations (live HTTP, offline)
//! - `backend` - Subscription backend implementations (HTTP, in-memory)

pub mod backend;
pub mod billing;

pub use backend::{HttpBackendConfig, HttpSubscriptionBackend, InMemorySubscriptionBackend};
pub use billing::{LiveBillingGateway, LiveGatewayConfig, OfflineBillingGateway};
