#![warn(missing_docs)]
//! Flakebound Statistical Engine
//!
//! Turns observed test-run outcomes into a stopping rule for flaky bugs:
//! - Minimum plausible failure probability from a Beta posterior (uniform prior)
//! - Number of consecutive passing runs needed after a fix
//! - Confidence-vs-retests curve sharing the planner's formula
//!
//! All operations are pure functions over `u64`/`f64` values.

mod curve;
mod error;
mod estimator;
mod planner;

pub use curve::{
    ConfidenceCurve, CurvePoint, CurvePoints, ReferenceCrossing, confidence, reference_crossings,
};
pub use error::StatsError;
pub use estimator::{MAX_MAJOR_SHAPE, MAX_MINOR_SHAPE, Posterior, estimate_min_probability};
pub use planner::{PlannerConfig, plan_retests, required_tests};

/// Default alpha (95% confidence)
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default ceiling on the number of retests the planner will report
pub const DEFAULT_MAX_RETESTS: u64 = 1_000_000_000;

/// Default curve span, as a multiple of the required retest count
pub const DEFAULT_CURVE_SPAN: u64 = 2;

/// Confidence levels drawn as reference lines next to the curve
pub const REFERENCE_CONFIDENCE_LEVELS: [f64; 3] = [0.90, 0.95, 0.99];

/// Check that `alpha` lies strictly inside (0, 1).
pub(crate) fn validate_alpha(alpha: f64) -> Result<(), StatsError> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::invalid(
            "alpha",
            format!("{alpha} is outside the open interval (0, 1)"),
        ))
    }
}
