//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `BillingGateway` - checkout, portal, and cancellation against a
//!   billing provider (live or offline)
//! - `SubscriptionBackend` - system of record for subscription state and
//!   usage counters

mod billing_gateway;
mod subscription_backend;

pub use billing_gateway::{
    BillingGateway, CheckoutOutcome, CheckoutRequest, GatewayError, GatewayErrorCode, PortalSession,
};
pub use subscription_backend::{BackendError, SubscriptionBackend};
