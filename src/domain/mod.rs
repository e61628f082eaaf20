//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - Plan definitions and the ordered plan table
//! - `usage` - Current-period usage snapshot
//! - `entitlement` - Pure feature/limit checks and the entitlement context
//! - `subscription` - Subscription record and lifecycle state machine
//! - `upgrade` - Contextual upgrade prompt selection

pub mod catalog;
pub mod entitlement;
pub mod foundation;
pub mod subscription;
pub mod upgrade;
pub mod usage;
