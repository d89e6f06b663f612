//! Run configuration
//!
//! ```toml
//! batch_size = 500
//! chunk_size = 100000
//! check_order = true
//! ```
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{IndexError, IndexResult};

const DEFAULT_BATCH_SIZE: usize = 250;
const DEFAULT_CHUNK_SIZE: u32 = 50_000;

/// Tunables of one indexing run
///
/// Every field is optional in the TOML file, missing fields use the
/// values of [`IndexConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Number of records handed to the sink in one batch
    pub batch_size: usize,
    /// Width of one key range when a scan is split into chunks
    pub chunk_size: u32,
    /// Verify that the row stream is sorted by BSU
    ///
    /// Enabled by default in debug builds.
    pub check_order: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            check_order: cfg!(debug_assertions),
        }
    }
}

impl IndexConfig {
    /// Reads, parses and validates a TOML config file
    ///
    /// # Errors
    ///
    /// - [`IndexError::ReadConfig`] if the file cannot be read
    /// - [`IndexError::ParseConfig`] if it is not valid TOML or has unknown keys
    /// - [`IndexError::InvalidConfig`] if a value is out of range
    pub fn load(path: &Path) -> IndexResult<Self> {
        let raw = fs::read_to_string(path).map_err(|err| IndexError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })?;

        let cfg: IndexConfig = toml::from_str(&raw).map_err(|err| IndexError::ParseConfig {
            path: path.to_path_buf(),
            source: err,
        })?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Checks all values for sanity
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidConfig`] naming the offending field
    pub fn validate(&self) -> IndexResult<()> {
        if self.batch_size == 0 {
            return Err(IndexError::InvalidConfig(
                "batch_size must be greater than zero.".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(IndexError::InvalidConfig(
                "chunk_size must be greater than zero.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shortcut for [`IndexConfig::load`]
pub fn load(path: &Path) -> IndexResult<IndexConfig> {
    IndexConfig::load(path)
}
