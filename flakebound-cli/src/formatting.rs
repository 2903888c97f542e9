//! Output Formatting
//!
//! Human-readable terminal output for an analysis report:
//! - Headline retest count
//! - Minimum failure probability and the observation behind it
//! - Runs needed for each reference confidence level
//! - Optional text chart of the confidence curve

use flakebound_report::{REFERENCE_ARTICLE, Report, render_text_chart};

/// Chart dimensions for human output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
}

/// Format a report for human-readable terminal display
///
/// # Arguments
/// * `report` - Complete analysis report
/// * `chart` - Chart dimensions, or `None` to skip the chart
pub fn format_human_output(report: &Report, chart: Option<ChartSize>) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Flaky Bug Analysis\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    output.push_str(&format!(
        "  Passing runs required after the fix: {}\n\n",
        report.plan.required_tests
    ));

    let observation = &report.observation;
    output.push_str(&format!(
        "  observed: {} failure(s) in {} run(s)\n",
        observation.failures, observation.trials
    ));
    output.push_str(&format!(
        "  minimum failure probability: {:.3} ({:.0}% confidence)\n",
        report.estimate.pmin,
        report.estimate.confidence_level * 100.0
    ));
    output.push_str(&format!(
        "  posterior: Beta({}, {})  mean {:.3}\n",
        report.estimate.posterior_a, report.estimate.posterior_b, report.estimate.posterior_mean
    ));
    output.push_str(&format!(
        "  confidence after {} passing runs: {:.2}%\n",
        report.plan.required_tests,
        report.plan.achieved_confidence * 100.0
    ));

    if !report.reference_levels.is_empty() {
        output.push_str("\nReference levels\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("  {:>10}  {:>14}\n", "Confidence", "Passing runs"));
        for level in &report.reference_levels {
            let runs = match level.required_tests {
                Some(t) => t.to_string(),
                None => format!("> {}", report.plan.max_tests),
            };
            output.push_str(&format!(
                "  {:>9.0}%  {:>14}\n",
                level.confidence * 100.0,
                runs
            ));
        }
    }

    if let Some(size) = chart {
        let plot = render_text_chart(report, size.width, size.height);
        if !plot.is_empty() {
            output.push_str("\nConfidence vs. additional passing runs\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            output.push_str(&plot);
        }
    }

    output.push_str(&format!("\nReference: {}\n", REFERENCE_ARTICLE));
    output
}
