//! Report Data Structures

use chrono::{DateTime, Utc};
use flakebound_stats::{CurvePoint, ReferenceCrossing};
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub observation: Observation,
    pub estimate: Estimate,
    pub plan: RetestPlan,
    pub reference_levels: Vec<ReferenceLevel>,
    pub curve: Vec<CurveSample>,
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn now() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// What was observed before the fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Runs performed
    pub trials: u64,
    /// Runs in which the bug showed up
    pub failures: u64,
    /// Confidence complement used throughout
    pub alpha: f64,
}

/// Failure probability estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Lower bound on the per-run failure probability
    pub pmin: f64,
    /// Confidence attached to the lower bound (`1 - alpha`)
    pub confidence_level: f64,
    /// Beta posterior shape `a`
    pub posterior_a: f64,
    /// Beta posterior shape `b`
    pub posterior_b: f64,
    /// Beta posterior mean
    pub posterior_mean: f64,
}

/// Retest recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetestPlan {
    /// Consecutive passing runs needed after the fix
    pub required_tests: u64,
    /// Confidence actually reached after `required_tests` runs
    pub achieved_confidence: f64,
    /// Ceiling the planner was allowed to report
    pub max_tests: u64,
}

/// Runs needed to reach a reference confidence line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLevel {
    pub confidence: f64,
    /// `None` when beyond the planner ceiling
    pub required_tests: Option<u64>,
}

impl From<ReferenceCrossing> for ReferenceLevel {
    fn from(crossing: ReferenceCrossing) -> Self {
        Self {
            confidence: crossing.confidence,
            required_tests: crossing.required_tests,
        }
    }
}

/// One point of the confidence curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub tests: u64,
    pub confidence: f64,
}

impl From<CurvePoint> for CurveSample {
    fn from(point: CurvePoint) -> Self {
        Self {
            tests: point.tests,
            confidence: point.confidence,
        }
    }
}
