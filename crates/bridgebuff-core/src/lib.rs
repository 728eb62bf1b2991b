//! # bridgebuff-core
//!
//! Core library for the BridgeBuff score analysis client.
//!
//! This crate provides:
//! - A request/response transport over a raw byte stream with idle-timeout
//!   framing, length validation and bounded retries
//! - A client for the score service's ranked listings and game details
//! - Gas performance and cannon placement analyses
//! - CSV, JSON and console rendering of the resulting reports

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod network;
pub mod retry;

// Re-export from analysis module
pub use analysis::{
    Analysis, AnalysisKind, AnalysisReport, Bucket, Buckets, CannonPlacement, GasPerformance,
    GasPerformanceRow, PlacementRow, analyze_cannon_placements, analyze_gas_performance,
    placement_signature, row_counts, run_analysis,
};

// Re-export from api module
pub use api::{GameRecord, GameStats, Page, Placement, Ranking, ScoreClient};

// Re-export from config module
pub use config::{ClientConfig, ClientConfigBuilder, PaginationConfig, PaginationMode, TransportConfig};

// Re-export from error module
pub use error::{Error, FramingError, Result};

// Re-export from export module
pub use export::{
    ExportFormat, ReportRow, format_csv, format_report_console, generate_json, write_report,
};

// Re-export from network module
pub use network::{Connection, Headers, ParsedResponse, Request, Transport, decode};

// Re-export from retry module
pub use retry::{FixedDelay, RetryStrategy, attempt};
