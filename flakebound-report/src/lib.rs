#![warn(missing_docs)]
//! Flakebound Report - Output Formats
//!
//! Generates various output formats for an analysis:
//! - JSON (machine-readable, parses back into [`Report`])
//! - CSV (confidence curve for spreadsheets)
//! - Text chart (curve against the 90/95/99% reference lines)

mod chart;
mod csv;
mod json;
mod report;

pub use chart::render_text_chart;
pub use csv::generate_csv_report;
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    CurveSample, Estimate, Observation, ReferenceLevel, Report, ReportMeta, RetestPlan,
    SCHEMA_VERSION,
};

/// Where the method behind the estimate is explained
pub const REFERENCE_ARTICLE: &str = "https://www.lpenz.org/articles/bugprobhunt/index.html";

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV of the confidence curve
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Human => write!(f, "human"),
        }
    }
}
