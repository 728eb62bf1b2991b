//! Client configuration.
//!
//! This module contains:
//! - Transport, pagination and endpoint defaults as constant modules
//! - `ClientConfig` and its sections, deserializable from a config file
//! - `ClientConfigBuilder` for programmatic overrides

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Exchange framing and retry configuration.
///
/// Worst case per exchange: 8 attempts × 200ms idle timeout = ~1.6s.
pub mod transport {
    /// Idle time (in ms) after which the peer is considered done sending.
    pub const IDLE_TIMEOUT_MS: u64 = 200;

    /// Maximum number of write/read cycles for a single exchange.
    pub const MAX_ATTEMPTS: u32 = 8;

    /// Extra delay (in ms) between attempts. The idle timeout already spaces them out.
    pub const RETRY_DELAY_MS: u64 = 0;

    /// Size of each read from the connection.
    pub const READ_CHUNK_SIZE: usize = 4096;
}

/// Ranked listing pagination configuration.
pub mod pagination {
    /// Records requested per listing page.
    pub const DEFAULT_PAGE_SIZE: u32 = 50;

    /// Largest `limit` the listing endpoint accepts.
    pub const MAX_PAGE_SIZE: u32 = 50;

    /// Highest `start` offset the collector will request.
    pub const DEFAULT_HARD_CAP: u32 = 10_000;
}

/// Remote API paths.
pub mod endpoints {
    /// Ranked listing, followed by `/<ranking>`.
    pub const RANK_PATH: &str = "/api/rank";

    /// Game detail, followed by `/<id>`.
    pub const GAME_PATH: &str = "/api/game";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub idle_timeout_ms: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: transport::IDLE_TIMEOUT_MS,
            max_attempts: transport::MAX_ATTEMPTS,
            retry_delay_ms: transport::RETRY_DELAY_MS,
        }
    }
}

impl TransportConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// How the listing `limit` evolves between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Every request uses the configured page size.
    #[default]
    Fixed,
    /// Legacy behavior: the limit grows by `step` each round, capped at
    /// [`pagination::MAX_PAGE_SIZE`].
    Growing { step: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: u32,
    pub hard_cap: u32,
    pub mode: PaginationMode,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: pagination::DEFAULT_PAGE_SIZE,
            hard_cap: pagination::DEFAULT_HARD_CAP,
            mode: PaginationMode::Fixed,
        }
    }
}

impl PaginationConfig {
    /// Limit to request on the given round (0-indexed).
    pub fn limit_for_round(&self, round: u32) -> u32 {
        match self.mode {
            PaginationMode::Fixed => self.page_size,
            PaginationMode::Growing { step } => self
                .page_size
                .saturating_add(step.saturating_mul(round))
                .min(pagination::MAX_PAGE_SIZE),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    pub pagination: PaginationConfig,
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Reject values that would make the client loop forever or never send.
    pub fn validate(&self) -> Result<()> {
        if self.transport.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        if self.transport.idle_timeout_ms == 0 {
            return Err(Error::Config(
                "idle_timeout_ms must be greater than 0".to_string(),
            ));
        }
        let page_size = self.pagination.page_size;
        if page_size == 0 || page_size > pagination::MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                pagination::MAX_PAGE_SIZE,
                page_size
            )));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base: Option<ClientConfig>,
    idle_timeout_ms: Option<u64>,
    max_attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
    page_size: Option<u32>,
    hard_cap: Option<u32>,
    mode: Option<PaginationMode>,
}

impl ClientConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from a file)
    pub fn base(mut self, config: ClientConfig) -> Self {
        self.base = Some(config);
        self
    }

    pub fn idle_timeout_ms(mut self, ms: u64) -> Self {
        self.idle_timeout_ms = Some(ms);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.retry_delay_ms = Some(ms);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn hard_cap(mut self, cap: u32) -> Self {
        self.hard_cap = Some(cap);
        self
    }

    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let mut config = self.base.unwrap_or_default();
        if let Some(ms) = self.idle_timeout_ms {
            config.transport.idle_timeout_ms = ms;
        }
        if let Some(attempts) = self.max_attempts {
            config.transport.max_attempts = attempts;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.transport.retry_delay_ms = ms;
        }
        if let Some(size) = self.page_size {
            config.pagination.page_size = size;
        }
        if let Some(cap) = self.hard_cap {
            config.pagination.hard_cap = cap;
        }
        if let Some(mode) = self.mode {
            config.pagination.mode = mode;
        }
        config.validate()?;
        Ok(config)
    }
}
