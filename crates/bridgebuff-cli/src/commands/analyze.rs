//! Analyze command: connect, run one analysis, export the report.

use std::net::TcpStream;
use std::path::Path;

use anyhow::{Context, Result};
use bridgebuff_core::{
    AnalysisReport, ExportFormat, ReportRow, ScoreClient, analyze_cannon_placements,
    analyze_gas_performance, format_report_console, write_report,
};
use tracing::{info, warn};

use crate::cli::{AnalysisArg, Args};
use crate::config;

pub fn run(args: &Args) -> Result<()> {
    let config = config::resolve(args)?;
    let format = args.export_format();

    let address = format!("{}:{}", args.ip, args.port);
    info!("Connecting to {}", address);
    let stream = TcpStream::connect(&address)
        .with_context(|| format!("Failed to connect to {}", address))?;

    let mut client = ScoreClient::new(stream, args.ip.as_str(), config.transport.clone());

    match args.analysis {
        AnalysisArg::Gas => {
            let report = analyze_gas_performance(&mut client, &config.pagination);
            export(&report, &args.output, format, args.quiet)
        }
        AnalysisArg::Placement => {
            let report = analyze_cannon_placements(&mut client, &config.pagination);
            export(&report, &args.output, format, args.quiet)
        }
    }
}

fn export<R: ReportRow>(
    report: &AnalysisReport<R>,
    output: &Path,
    format: ExportFormat,
    quiet: bool,
) -> Result<()> {
    if report.listed == 0 {
        warn!("The server listed no games; writing an empty report");
    }

    write_report(output, format, report)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    if !quiet {
        println!("{}", format_report_console(report));
    }
    eprintln!("Exported {} rows to: {}", report.rows.len(), output.display());

    Ok(())
}
