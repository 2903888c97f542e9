//! Error taxonomy shared by the estimator and the planner

use thiserror::Error;

/// Errors from the statistical operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A precondition on an input was violated; nothing is clamped.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The retest count would exceed the configured ceiling.
    #[error(
        "No practical finite retest count suffices: about {required:.3e} runs needed, ceiling is {ceiling}"
    )]
    ResultTooLarge {
        /// Real-valued requirement before rounding (may be infinite)
        required: f64,
        /// Ceiling that was exceeded
        ceiling: u64,
    },

    /// The inverse Beta evaluation did not produce a usable quantile.
    #[error("Numeric instability in inverse Beta evaluation: {reason}")]
    NumericInstability {
        /// Description of the failure
        reason: String,
    },
}

impl StatsError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        StatsError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn unstable(reason: impl Into<String>) -> Self {
        StatsError::NumericInstability {
            reason: reason.into(),
        }
    }

    /// Whether this is a precondition violation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StatsError::InvalidArgument { .. })
    }
}
