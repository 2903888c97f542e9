#![warn(missing_docs)]
//! # Flakebound
//!
//! A principled stopping rule for intermittent failures.
//!
//! You ran a test `n` times and saw the bug `k` times. You pushed a fix. How
//! many consecutive green runs do you need before you believe it?
//!
//! - **Minimum failure probability**: the `alpha`-quantile of the Beta(`k+1`,
//!   `n-k+1`) posterior, a conservative lower bound on how often the bug fires
//! - **Retest count**: smallest `t` with `1 - (1 - pmin)^t >= 1 - alpha`
//! - **Confidence curve**: the same formula swept over `t`, for plotting
//!
//! ## Quick Start
//!
//! ```
//! use flakebound::{estimate_min_probability, required_tests};
//!
//! let pmin = estimate_min_probability(4, 1, 0.05)?;
//! let runs = required_tests(pmin, 0.05)?;
//! assert_eq!(runs, 38);
//! # Ok::<(), flakebound::StatsError>(())
//! ```

// Re-export the statistical core
pub use flakebound_stats::{
    ConfidenceCurve, CurvePoint, CurvePoints, DEFAULT_ALPHA, DEFAULT_CURVE_SPAN,
    DEFAULT_MAX_RETESTS, PlannerConfig, Posterior, REFERENCE_CONFIDENCE_LEVELS, ReferenceCrossing,
    StatsError, confidence, estimate_min_probability, plan_retests, reference_crossings,
    required_tests,
};

// Re-export report types
pub use flakebound_report::{
    OutputFormat, Report, generate_csv_report, generate_json_report, parse_json_report,
    render_text_chart,
};

// Re-export the analysis pipeline
pub use flakebound_cli::{AnalysisRequest, analyze};

/// Run the Flakebound CLI.
///
/// ```ignore
/// fn main() {
///     flakebound::run().unwrap();
/// }
/// ```
pub use flakebound_cli::run;
