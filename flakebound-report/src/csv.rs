//! CSV Output
//!
//! One row per curve point, ready for a spreadsheet chart.

use crate::report::Report;

/// Generate the confidence curve as CSV.
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from("tests,confidence\n");
    for sample in &report.curve {
        output.push_str(&format!("{},{:.6}\n", sample.tests, sample.confidence));
    }
    output
}
