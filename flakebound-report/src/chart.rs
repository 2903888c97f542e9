//! Text Chart
//!
//! Plots the confidence curve in a terminal with dashed lines at each
//! reference confidence level:
//!
//! ```text
//!    99% |--------------------*****************
//! 90/95% |-----------****-----------------------
//!        |       ***
//!        |    **
//!     0% |**
//!        +--------------------------------------
//!         1                                   76
//! ```

use crate::report::Report;

const CURVE_MARK: char = '*';
const REFERENCE_MARK: char = '-';

/// Render the report's curve as a `width` x `height` character plot.
///
/// Returns an empty string when the curve is empty or the plot area is
/// smaller than 2 x 2.
pub fn render_text_chart(report: &Report, width: usize, height: usize) -> String {
    if report.curve.is_empty() || width < 2 || height < 2 {
        return String::new();
    }

    let row_of = |confidence: f64| -> usize {
        let row = (confidence.clamp(0.0, 1.0) * (height - 1) as f64).round() as usize;
        row.min(height - 1)
    };

    // grid[0] is the bottom row
    let mut grid = vec![vec![' '; width]; height];
    let mut labels: Vec<Vec<String>> = vec![Vec::new(); height];

    for level in &report.reference_levels {
        let row = row_of(level.confidence);
        grid[row].iter_mut().for_each(|cell| *cell = REFERENCE_MARK);
        labels[row].push(format!("{:.0}", level.confidence * 100.0));
    }

    let last = report.curve.len() - 1;
    for column in 0..width {
        let index = (column as f64 * last as f64 / (width - 1) as f64).round() as usize;
        let sample = &report.curve[index.min(last)];
        grid[row_of(sample.confidence)][column] = CURVE_MARK;
    }

    let label_for = |row: usize| -> String {
        if !labels[row].is_empty() {
            format!("{}%", labels[row].join("/"))
        } else if row == height - 1 {
            "100%".to_string()
        } else if row == 0 {
            "0%".to_string()
        } else {
            String::new()
        }
    };
    let label_width = (0..height).map(|row| label_for(row).len()).max().unwrap_or(0);

    let mut output = String::new();
    for row in (0..height).rev() {
        let line: String = grid[row].iter().collect();
        output.push_str(&format!(
            "{:>lw$} |{}\n",
            label_for(row),
            line.trim_end(),
            lw = label_width
        ));
    }
    output.push_str(&format!("{:>lw$} +{}\n", "", "-".repeat(width), lw = label_width));

    let first_tests = report.curve[0].tests.to_string();
    let last_tests = report.curve[last].tests.to_string();
    let gap = width.saturating_sub(first_tests.len() + last_tests.len()).max(1);
    output.push_str(&format!(
        "{:>lw$}  {}{}{}\n",
        "",
        first_tests,
        " ".repeat(gap),
        last_tests,
        lw = label_width
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_chart_dimensions() {
        let chart = render_text_chart(&sample_report(), 20, 6);
        let lines: Vec<&str> = chart.lines().collect();
        // plot rows + axis + tick labels
        assert_eq!(lines.len(), 8);
        assert!(lines[6].ends_with(&"-".repeat(20)));
        assert!(lines[7].trim_start().starts_with('1'));
        assert!(lines[7].trim_end().ends_with("10"));
    }

    #[test]
    fn test_chart_reference_labels() {
        let chart = render_text_chart(&sample_report(), 20, 21);
        assert!(chart.contains("99% |"));
        assert!(chart.contains("95% |"));
        assert!(chart.contains("90% |"));
        assert!(chart.contains("0% |"));
        assert!(chart.contains(CURVE_MARK));
    }

    #[test]
    fn test_chart_merges_close_levels() {
        // with 6 rows all three levels land on the top row
        let chart = render_text_chart(&sample_report(), 20, 6);
        assert!(chart.contains("90/95/99% |"));
    }

    #[test]
    fn test_chart_degenerate() {
        let mut report = sample_report();
        assert!(render_text_chart(&report, 1, 10).is_empty());
        assert!(render_text_chart(&report, 10, 1).is_empty());
        report.curve.clear();
        assert!(render_text_chart(&report, 40, 10).is_empty());
    }
}
