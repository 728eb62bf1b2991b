//! CLI argument definitions for bridgebuff.

use std::path::PathBuf;

use bridgebuff_core::ExportFormat;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bridgebuff")]
#[command(about = "BridgeBuff score analysis client", version)]
pub struct Args {
    /// Score server address
    pub ip: String,

    /// Score server port
    pub port: u16,

    /// Analysis to run (1 = gas performance, 2 = cannon placement)
    #[arg(value_enum)]
    pub analysis: AnalysisArg,

    /// Output file path
    pub output: PathBuf,

    /// TOML config file
    #[arg(short, long, value_name = "FILE", env = "BRIDGEBUFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (default: from the output file extension, else CSV)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Idle time in ms that ends a response
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Attempts per request before giving up
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Games per listing page (1-50)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Highest listing offset to request
    #[arg(long)]
    pub hard_cap: Option<u32>,

    /// Grow the page limit by this much every page (legacy pagination)
    #[arg(long)]
    pub growing_step: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print the report to the console
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AnalysisArg {
    /// Average sunk ships per gas
    #[value(name = "gas", alias = "1")]
    Gas,
    /// Average escaped ships per cannon placement
    #[value(name = "placement", alias = "2")]
    Placement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

impl Args {
    /// Explicit `--format`, else the output extension, else CSV
    pub fn export_format(&self) -> ExportFormat {
        self.format
            .map(ExportFormat::from)
            .or_else(|| ExportFormat::from_path(&self.output))
            .unwrap_or_default()
    }
}
