//! Analysis Pipeline
//!
//! Composes the two core operations and the presentation data into a
//! [`Report`]:
//!
//! ```text
//! (trials, failures, alpha)
//!       │
//!       ▼
//! estimate_min_probability ──► pmin
//!       │
//!       ▼
//! plan_retests ──► required_tests
//!       │
//!       ▼
//! reference_crossings + ConfidenceCurve ──► Report
//! ```

use flakebound_report::{
    CurveSample, Estimate, Observation, ReferenceLevel, Report, ReportMeta, RetestPlan,
};
use flakebound_stats::{
    ConfidenceCurve, PlannerConfig, Posterior, StatsError, confidence, estimate_min_probability,
    plan_retests, reference_crossings,
};

/// Fully resolved inputs for one analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    /// Runs performed before the fix
    pub trials: u64,
    /// Runs in which the bug showed up
    pub failures: u64,
    /// Confidence complement
    pub alpha: f64,
    /// Planner ceiling
    pub max_retests: u64,
    /// Curve length as a multiple of the required retest count
    pub curve_span: u64,
    /// Most curve points kept in the report
    pub max_curve_points: usize,
}

/// Run the estimator and planner and collect everything the outputs need.
pub fn analyze(request: &AnalysisRequest) -> Result<Report, StatsError> {
    tracing::debug!(
        trials = request.trials,
        failures = request.failures,
        alpha = request.alpha,
        "estimating minimum failure probability"
    );
    let pmin = estimate_min_probability(request.trials, request.failures, request.alpha)?;
    let posterior = Posterior::from_observations(request.trials, request.failures)?;

    let planner = PlannerConfig {
        max_tests: request.max_retests,
    };
    let required_tests = plan_retests(pmin, request.alpha, &planner)?;
    tracing::debug!(pmin, required_tests, "retest plan ready");

    let reference_levels = reference_crossings(pmin, &planner)?
        .into_iter()
        .map(ReferenceLevel::from)
        .collect();

    let curve = ConfidenceCurve::for_plan(pmin, required_tests, request.curve_span)?;
    let curve = sample_curve(&curve, request.max_curve_points);

    Ok(Report {
        meta: ReportMeta::now(),
        observation: Observation {
            trials: request.trials,
            failures: request.failures,
            alpha: request.alpha,
        },
        estimate: Estimate {
            pmin,
            confidence_level: 1.0 - request.alpha,
            posterior_a: posterior.a,
            posterior_b: posterior.b,
            posterior_mean: posterior.mean(),
        },
        plan: RetestPlan {
            required_tests,
            achieved_confidence: confidence(pmin, required_tests),
            max_tests: request.max_retests,
        },
        reference_levels,
        curve,
    })
}

/// Thin `curve` to at most `max_points` evenly spaced points, keeping the last one.
pub fn sample_curve(curve: &ConfidenceCurve, max_points: usize) -> Vec<CurveSample> {
    let bound = curve.bound();
    if max_points == 0 || bound == 0 {
        return Vec::new();
    }
    if bound <= max_points as u64 {
        return curve.iter().map(CurveSample::from).collect();
    }
    if max_points == 1 {
        return curve.iter().next_back().map(CurveSample::from).into_iter().collect();
    }

    let stride = bound.div_ceil(max_points as u64 - 1);
    let stride = usize::try_from(stride).unwrap_or(usize::MAX);
    let mut samples: Vec<CurveSample> = curve
        .iter()
        .step_by(stride)
        .map(CurveSample::from)
        .collect();
    if samples.last().map(|s| s.tests) != Some(bound) {
        if let Some(last) = curve.iter().next_back() {
            samples.push(last.into());
        }
    }
    samples
}
