//! Plan catalog domain module.
//!
//! The catalog is an immutable table of plan definitions: identifiers,
//! per-resource limits, feature flags, and display metadata. Everything else
//! in the entitlement engine is computed from it.
//!
//! # Module Structure
//!
//! - `plan` - Plan definition and per-plan lookups
//! - `table` - PlanCatalog with tier ordering and feature index

mod plan;
mod table;

pub use plan::{FeatureLabel, Plan, UNLIMITED};
pub use table::{PlanCatalog, YEARLY_DISCOUNT_PERCENT};
