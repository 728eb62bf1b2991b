//! Config file loading and command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bridgebuff_core::{ClientConfig, PaginationMode};
use tracing::info;

use crate::cli::Args;

/// Load a TOML config file. Missing sections and keys take their defaults.
pub fn load_config_file(path: &Path) -> Result<ClientConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ClientConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Config file (if any) with command-line overrides applied, validated.
pub fn resolve(args: &Args) -> Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => {
            let config = load_config_file(path)?;
            info!("Loaded config from {}", path.display());
            config
        }
        None => ClientConfig::default(),
    };

    let mut builder = ClientConfig::builder().base(base);
    if let Some(ms) = args.timeout_ms {
        builder = builder.idle_timeout_ms(ms);
    }
    if let Some(attempts) = args.attempts {
        builder = builder.max_attempts(attempts);
    }
    if let Some(size) = args.page_size {
        builder = builder.page_size(size);
    }
    if let Some(cap) = args.hard_cap {
        builder = builder.hard_cap(cap);
    }
    if let Some(step) = args.growing_step {
        builder = builder.mode(PaginationMode::Growing { step });
    }

    builder.build().context("Invalid configuration")
}
