//! Entitlement evaluation.
//!
//! The evaluator answers "is X allowed" and "how close to the limit" from a
//! plan and a usage snapshot. The check functions are pure and synchronous;
//! the only place an effect happens is the guard methods on
//! [`EntitlementContext`], which run the gated action and return a tagged
//! [`Gate`] result instead of an out-of-band UI side effect.
//!
//! # Module Structure
//!
//! - `evaluator` - pure feature and limit checks
//! - `gate` - tagged allowed/denied result
//! - `context` - explicit plan + usage + subscription bundle

mod context;
mod evaluator;
mod gate;

pub use context::EntitlementContext;
pub use evaluator::{can_create, check_limit, has_feature, LimitCheck};
pub use gate::Gate;
