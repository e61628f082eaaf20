//! Shared value objects for the entitlement domain.
//!
//! # Module Structure
//!
//! - `errors` - DomainError / ValidationError types
//! - `ids` - Strongly-typed identifiers
//! - `state_machine` - StateMachine trait for lifecycle enums
//! - `timestamp` - UTC Timestamp value object

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::SubscriptionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
