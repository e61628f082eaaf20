//! Tagged result of a guarded action.

use crate::domain::upgrade::UpgradeContext;

/// Outcome of running an action behind a feature or limit gate.
///
/// Callers pattern-match instead of combining a boolean with an out-of-band
/// "open the upgrade modal" effect: a denial carries the prompt context the
/// presentation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate<T> {
    /// The gate passed; the action ran and produced this value.
    Allowed(T),

    /// The gate blocked the action; show this upgrade prompt.
    Denied(UpgradeContext),
}

impl<T> Gate<T> {
    /// Returns true if the action ran.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Gate::Allowed(_))
    }

    /// Returns true if the action was blocked.
    pub fn is_denied(&self) -> bool {
        matches!(self, Gate::Denied(_))
    }

    /// The action's result, if it ran.
    pub fn into_allowed(self) -> Option<T> {
        match self {
            Gate::Allowed(value) => Some(value),
            Gate::Denied(_) => None,
        }
    }

    /// The denial's prompt context, if blocked.
    pub fn denied_context(&self) -> Option<&UpgradeContext> {
        match self {
            Gate::Allowed(_) => None,
            Gate::Denied(ctx) => Some(ctx),
        }
    }
}
