//! Subscription lifecycle domain module.
//!
//! # Module Structure
//!
//! - `interval` - Billing interval (monthly/yearly)
//! - `status` - SubscriptionStatus state machine
//! - `record` - SubscriptionRecord aggregate

mod interval;
mod record;
mod status;

pub use interval::BillingInterval;
pub use record::SubscriptionRecord;
pub use status::SubscriptionStatus;
