//! Export formats for analysis reports.

mod console;

pub use console::format_report_console;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use strum::{Display, IntoStaticStr};

use crate::analysis::{AnalysisKind, AnalysisReport, GasPerformanceRow, PlacementRow};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension (`.json` → JSON, `.csv` → CSV)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if extension.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else {
            None
        }
    }
}

/// A report row that can be written as CSV and shown on the console.
pub trait ReportRow: Serialize {
    const KIND: AnalysisKind;

    fn csv_header() -> &'static [&'static str];

    fn csv_fields(&self) -> Vec<String>;

    /// Labelled values for the console summary
    fn console_fields(&self) -> Vec<(&'static str, String)>;
}

impl ReportRow for GasPerformanceRow {
    const KIND: AnalysisKind = AnalysisKind::GasPerformance;

    fn csv_header() -> &'static [&'static str] {
        &["gas", "games", "average_sunk"]
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.gas.clone(),
            self.games.to_string(),
            self.average_sunk.to_string(),
        ]
    }

    fn console_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Gas", self.gas.clone()),
            ("Games", self.games.to_string()),
            ("Average sunk ships", format!("{:.2}", self.average_sunk)),
        ]
    }
}

impl ReportRow for PlacementRow {
    const KIND: AnalysisKind = AnalysisKind::CannonPlacement;

    fn csv_header() -> &'static [&'static str] {
        &["signature", "average_escaped"]
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![self.signature.clone(), self.average_escaped.to_string()]
    }

    fn console_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Normalized cannon placement", self.signature.clone()),
            ("Games", self.games.to_string()),
            ("Average escaped ships", format!("{:.2}", self.average_escaped)),
        ]
    }
}

/// Quote a CSV field if it contains a separator, quote or line break
fn escape_csv(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn format_csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_csv(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line followed by one line per row
pub fn format_csv<R: ReportRow>(rows: &[R]) -> String {
    let mut lines = vec![format_csv_line(R::csv_header())];
    lines.extend(rows.iter().map(|row| format_csv_line(&row.csv_fields())));
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Pretty JSON document with the rows and the stage counters
pub fn generate_json<R: ReportRow>(report: &AnalysisReport<R>) -> Result<String> {
    let document = json!({
        "analysis": R::KIND,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "listed": report.listed,
        "fetched": report.fetched,
        "failed": report.failed,
        "incomplete": report.incomplete,
        "rows": report.rows,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write a report to `path` in the given format
pub fn write_report<P: AsRef<Path>, R: ReportRow>(
    path: P,
    format: ExportFormat,
    report: &AnalysisReport<R>,
) -> Result<()> {
    let content = match format {
        ExportFormat::Csv => format_csv(&report.rows),
        ExportFormat::Json => generate_json(report)?,
    };
    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
