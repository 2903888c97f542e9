//! Minimum Failure Probability
//!
//! Models the unknown per-run failure rate with a Beta posterior built from a
//! uniform Beta(1, 1) prior and the observed outcomes: `a = k + 1`,
//! `b = n - k + 1`. The estimate is the posterior `alpha`-quantile: there is
//! only an `alpha` chance that the true rate lies below it.
//!
//! The two tails have exact closed forms and never touch the iterative solver:
//! - `k = 0`: `1 - (1 - alpha)^(1/(n+1))`
//! - `k = n`: `alpha^(1/(n+1))`
//!
//! Interior quantiles start from `inv_beta_reg` and are polished with a
//! bracketed Newton iteration on the regularized incomplete beta `I_x(a, b)`.
//! The incomplete beta in `statrs` sums a continued fraction capped at 140
//! terms and subtracts `ln_gamma` values, which bounds the posteriors it
//! resolves to double precision: see [`MAX_MINOR_SHAPE`] and [`MAX_MAJOR_SHAPE`].

use crate::error::StatsError;
use crate::validate_alpha;
use statrs::distribution::{Beta, Continuous, ContinuousCDF};
use statrs::function::beta::inv_beta_reg;

/// Largest smaller shape `min(a, b)` whose continued fraction converges at every alpha
pub const MAX_MINOR_SHAPE: f64 = 1.0e4;

/// Largest shape `max(a, b)` before `ln_gamma` cancellation costs more than 1e-6 relative
pub const MAX_MAJOR_SHAPE: f64 = 1.0e8;

/// `inv_beta_reg` starts at `x >= 1e-4`, where the density overflows for larger shapes
const SOLVER_SEED_SHAPE: f64 = 1.0e6;

/// Newton / bisection steps allowed while polishing a quantile
const MAX_REFINE_STEPS: u32 = 200;

/// Accepted relative gap between `I_x(a, b)` and `alpha` at the returned quantile
const RESIDUAL_TOLERANCE: f64 = 1.0e-6;

/// Beta posterior over the per-run failure probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posterior {
    /// Shape `a = failures + 1`
    pub a: f64,
    /// Shape `b = trials - failures + 1`
    pub b: f64,
}

impl Posterior {
    /// Posterior after observing `failures` out of `trials` runs.
    pub fn from_observations(trials: u64, failures: u64) -> Result<Self, StatsError> {
        if failures > trials {
            return Err(StatsError::invalid(
                "failures",
                format!("{failures} failures exceed {trials} trials"),
            ));
        }
        Ok(Self {
            a: failures as f64 + 1.0,
            b: (trials - failures) as f64 + 1.0,
        })
    }

    /// Posterior mean `a / (a + b)`
    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }

    /// Regularized incomplete beta `I_x(a, b)`
    pub fn cdf(&self, x: f64) -> Result<f64, StatsError> {
        Ok(self.distribution()?.cdf(x))
    }

    fn distribution(&self) -> Result<Beta, StatsError> {
        Beta::new(self.a, self.b).map_err(|e| {
            StatsError::unstable(format!(
                "cannot build Beta({}, {}): {}",
                self.a, self.b, e
            ))
        })
    }
}

/// Estimate the minimum plausible per-run failure probability.
///
/// Returns the `alpha`-quantile of Beta(`failures + 1`, `trials - failures + 1`).
/// With `failures = 0` the result is still strictly positive: a bug that was
/// never seen may still exist.
///
/// # Examples
///
/// ```
/// # use flakebound_stats::estimate_min_probability;
/// let pmin = estimate_min_probability(4, 1, 0.05).unwrap();
/// assert!((pmin - 0.076440).abs() < 1e-5);
/// ```
pub fn estimate_min_probability(trials: u64, failures: u64, alpha: f64) -> Result<f64, StatsError> {
    validate_alpha(alpha)?;
    let posterior = Posterior::from_observations(trials, failures)?;
    let shape_sum = trials as f64 + 1.0;

    let pmin = if failures == 0 {
        // 1 - (1 - alpha)^(1/(n+1)) without cancellation
        -((-alpha).ln_1p() / shape_sum).exp_m1()
    } else if failures == trials {
        (alpha.ln() / shape_sum).exp()
    } else {
        interior_quantile(&posterior, alpha)?
    };

    if !pmin.is_finite() || !(0.0..1.0).contains(&pmin) {
        return Err(StatsError::unstable(format!(
            "quantile {pmin} of Beta({}, {}) at {alpha} is outside [0, 1)",
            posterior.a, posterior.b
        )));
    }
    if pmin == 0.0 && failures > 0 {
        return Err(StatsError::unstable(format!(
            "quantile of Beta({}, {}) collapsed to zero despite {failures} observed failures",
            posterior.a, posterior.b
        )));
    }
    Ok(pmin)
}

fn interior_quantile(posterior: &Posterior, alpha: f64) -> Result<f64, StatsError> {
    let minor = posterior.a.min(posterior.b);
    let major = posterior.a.max(posterior.b);
    if minor > MAX_MINOR_SHAPE || major > MAX_MAJOR_SHAPE {
        return Err(StatsError::unstable(format!(
            "Beta({}, {}) is beyond the resolvable shapes (min <= {MAX_MINOR_SHAPE:e}, max <= {MAX_MAJOR_SHAPE:e})",
            posterior.a, posterior.b
        )));
    }

    let beta = posterior.distribution()?;
    let seed = if major <= SOLVER_SEED_SHAPE {
        inv_beta_reg(posterior.a, posterior.b, alpha)
    } else {
        posterior.mean()
    };
    let x = refine_quantile(&beta, alpha, seed);
    if !x.is_finite() {
        return Err(StatsError::unstable(format!(
            "inverse CDF of Beta({}, {}) at {alpha} is {x}",
            posterior.a, posterior.b
        )));
    }

    let residual = (beta.cdf(x) - alpha).abs();
    if residual > RESIDUAL_TOLERANCE * alpha {
        return Err(StatsError::unstable(format!(
            "inverse CDF of Beta({}, {}) did not converge (residual {residual:e} at x = {x})",
            posterior.a, posterior.b
        )));
    }
    Ok(x)
}

/// Newton iteration on `I_x(a, b) - alpha`, kept inside a shrinking bracket.
///
/// Steps that leave the bracket (or hit a zero density) fall back to halving
/// it, so the search always stays in (0, 1).
fn refine_quantile(beta: &Beta, alpha: f64, seed: f64) -> f64 {
    let (mut low, mut high) = (0.0, 1.0);
    let mut x = if seed > 0.0 && seed < 1.0 { seed } else { 0.5 };

    for _ in 0..MAX_REFINE_STEPS {
        let gap = beta.cdf(x) - alpha;
        if gap == 0.0 {
            break;
        }
        if gap < 0.0 {
            low = x;
        } else {
            high = x;
        }

        let mut next = x - gap / beta.ln_pdf(x).exp();
        if !(next > low && next < high) {
            next = if low == 0.0 { high / 2.0 } else { (low + high) / 2.0 };
        }
        let settled = (next - x).abs() <= 2.0 * f64::EPSILON * x;
        x = next;
        if settled {
            break;
        }
    }
    x
}
