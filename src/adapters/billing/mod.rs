//! Billing gateway adapters.
//!
//! - `LiveBillingGateway` - drives checkout and cancellation through the
//!   backend's billing endpoints (which own the Stripe secret)
//! - `OfflineBillingGateway` - resolves everything locally for demo and
//!   test environments

mod live_gateway;
mod offline_gateway;

pub use live_gateway::{LiveBillingGateway, LiveGatewayConfig};
pub use offline_gateway::OfflineBillingGateway;
