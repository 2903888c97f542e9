//! Retest Planning
//!
//! Smallest `t >= 1` with `1 - (1 - pmin)^t >= 1 - alpha`, i.e.
//! `t = ceil(ln(alpha) / ln(1 - pmin))`. The closed form is then settled
//! against [`confidence`] so that the curve and the count never disagree by a
//! rounding step.

use crate::curve::{confidence, validate_pmin};
use crate::error::StatsError;
use crate::{DEFAULT_MAX_RETESTS, validate_alpha};

/// Most single-step corrections applied to the closed-form estimate
const MAX_SETTLE_STEPS: u32 = 16;

/// Planner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Largest retest count reported before giving up with `ResultTooLarge`
    pub max_tests: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_tests: DEFAULT_MAX_RETESTS,
        }
    }
}

/// Passing runs needed after a fix, using the default ceiling.
///
/// # Examples
///
/// ```
/// # use flakebound_stats::required_tests;
/// assert_eq!(required_tests(0.1, 0.05).unwrap(), 29);
/// ```
pub fn required_tests(pmin: f64, alpha: f64) -> Result<u64, StatsError> {
    plan_retests(pmin, alpha, &PlannerConfig::default())
}

/// Passing runs needed after a fix to be `1 - alpha` confident that a bug
/// failing at rate `pmin` is gone.
pub fn plan_retests(pmin: f64, alpha: f64, config: &PlannerConfig) -> Result<u64, StatsError> {
    validate_pmin(pmin)?;
    validate_alpha(alpha)?;
    if config.max_tests == 0 {
        return Err(StatsError::invalid("max_tests", "ceiling must be at least 1"));
    }

    let required = alpha.ln() / (-pmin).ln_1p();
    let too_large = || StatsError::ResultTooLarge {
        required,
        ceiling: config.max_tests,
    };
    if !required.is_finite() || required > config.max_tests as f64 {
        return Err(too_large());
    }

    let target = 1.0 - alpha;
    let mut tests = (required.ceil() as u64).clamp(1, config.max_tests);

    for _ in 0..MAX_SETTLE_STEPS {
        if tests > 1 && confidence(pmin, tests - 1) >= target {
            tests -= 1;
        } else {
            break;
        }
    }
    for _ in 0..MAX_SETTLE_STEPS {
        if confidence(pmin, tests) >= target {
            break;
        }
        tests = tests.checked_add(1).ok_or_else(too_large)?;
        if tests > config.max_tests {
            return Err(too_large());
        }
    }

    Ok(tests)
}
