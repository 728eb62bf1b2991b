mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG takes precedence; otherwise info (debug with --verbose)
    let default_filter = if args.verbose {
        "bridgebuff=debug,bridgebuff_core=debug"
    } else {
        "bridgebuff=info,bridgebuff_core=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    commands::analyze::run(&args)
}
