// crates/riskarea-core/src/config.rs

//! Process-scoped configuration.
//!
//! Built once by the caller (the CLI layers a TOML file and `RISKAREA_*`
//! environment variables on top of these defaults) and passed explicitly
//! into the sink constructor.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Relation every normalized record is appended to.
pub const DEFAULT_TARGET_TABLE: &str = "zona_risco";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestConfig {
    /// PostgreSQL/PostGIS connection string. An empty value is accepted at
    /// startup; the first write then fails.
    #[serde(default)]
    pub database_url: String,
    /// Target relation for the appended rows.
    #[serde(default = "default_target_table")]
    pub target_table: String,
    /// Directory under which per-invocation scratch directories are created.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Object store region.
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Connection pool bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Connections the pool is sized for.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Extra connections allowed on top of `pool_size` under load.
    #[serde(default = "default_max_overflow")]
    pub max_overflow: u32,
    /// How long an append waits for a free connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Connections older (or idle longer) than this are recycled.
    #[serde(default = "default_recycle_secs")]
    pub recycle_secs: u64,
}

fn default_target_table() -> String {
    DEFAULT_TARGET_TABLE.to_string()
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_max_overflow() -> u32 {
    20
}

fn default_acquire_timeout_secs() -> u64 {
    300
}

fn default_recycle_secs() -> u64 {
    3600
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            target_table: default_target_table(),
            scratch_dir: default_scratch_dir(),
            region: default_region(),
            pool: PoolConfig::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            max_overflow: default_max_overflow(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            recycle_secs: default_recycle_secs(),
        }
    }
}

impl IngestConfig {
    /// Checks the values that end up inside SQL text.
    pub fn validate(&self) -> Result<()> {
        if !is_plain_identifier(&self.target_table) {
            return Err(IngestError::Config(format!(
                "target table '{}' is not a plain SQL identifier",
                self.target_table
            )));
        }
        match self.pool.pool_size.checked_add(self.pool.max_overflow) {
            None => Err(IngestError::Config(format!(
                "pool_size ({}) + max_overflow ({}) overflows the connection limit",
                self.pool.pool_size, self.pool.max_overflow
            ))),
            Some(0) => Err(IngestError::Config(
                "pool_size + max_overflow must allow at least one connection".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

impl PoolConfig {
    /// Hard upper bound of open connections. Saturates; [`IngestConfig::validate`]
    /// rejects sums that do not fit.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn recycle_after(&self) -> Duration {
        Duration::from_secs(self.recycle_secs)
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
