//! Console output formatting with colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::analysis::AnalysisReport;
use crate::export::ReportRow;

/// Format a report for console display with colored output
///
/// One labelled block per row, followed by a line with the stage counters.
pub fn format_report_console<R: ReportRow>(report: &AnalysisReport<R>) -> String {
    let mut output = String::new();
    let border = "━".repeat(50);

    let _ = writeln!(output, "{}", border.dimmed());
    let _ = writeln!(output, "  {}", R::KIND.title().bold());
    let _ = writeln!(output, "{}", border.dimmed());

    if report.rows.is_empty() {
        let _ = writeln!(output, "  {}", "No games available".yellow());
    }

    for row in &report.rows {
        let fields = row.console_fields();
        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in fields {
            let _ = writeln!(output, "  {:<width$} : {}", label, value.cyan(), width = width);
        }
        let _ = writeln!(output);
    }

    let failed = if report.failed > 0 {
        report.failed.red().to_string()
    } else {
        report.failed.to_string()
    };
    let _ = writeln!(
        output,
        "  {} listed, {} fetched, {} failed, {} incomplete",
        report.listed, report.fetched, failed, report.incomplete
    );
    let _ = write!(output, "{}", border.dimmed());

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{GasPerformanceRow, PlacementRow};

    #[test]
    fn test_console_lists_every_row() {
        let report = AnalysisReport {
            rows: vec![
                GasPerformanceRow {
                    gas: "gas-one".to_string(),
                    games: 3,
                    average_sunk: 2.0,
                },
                GasPerformanceRow {
                    gas: "gas-two".to_string(),
                    games: 1,
                    average_sunk: 5.0,
                },
            ],
            listed: 4,
            fetched: 4,
            failed: 0,
            incomplete: 0,
        };

        let output = format_report_console(&report);
        assert!(output.contains("Gas performance"));
        assert!(output.contains("gas-one"));
        assert!(output.contains("gas-two"));
        assert!(output.contains("Average sunk ships"));
        assert!(output.contains("2.00"));
        assert!(output.contains("4 listed"));
    }

    #[test]
    fn test_console_empty_report() {
        let report: AnalysisReport<PlacementRow> = AnalysisReport {
            rows: Vec::new(),
            listed: 0,
            fetched: 0,
            failed: 0,
            incomplete: 0,
        };

        let output = format_report_console(&report);
        assert!(output.contains("Cannon placement"));
        assert!(output.contains("No games available"));
    }
}
