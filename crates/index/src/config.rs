//! Build configuration via `quarry.toml`
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Command-line flags override values read from the file.

use std::path::Path;

use quarry_codec::{is_supported, DEFAULT_SCHEME, SUPPORTED_SCHEMES};
use quarry_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Documents per partition in production builds
pub const DEFAULT_PARTITION_SIZE: usize = 500_000;
/// Documents tokenized and hashed in parallel per batch
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Index build configuration loaded from `quarry.toml`.
///
/// # Example
///
/// ```toml
/// partition_size = 500000
/// codec = "simple9"
/// batch_size = 1024
/// min_token_len = 1
/// hash_seed = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Documents processed between partition flushes.
    #[serde(default = "default_partition_size")]
    pub partition_size: usize,
    /// Posting codec scheme: `"simple9"` or `"varbyte"`.
    #[serde(default = "default_codec")]
    pub codec: String,
    /// Documents tokenized and hashed in parallel before being applied in order.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Shortest token kept by the default tokenizer, in characters.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    /// Seed of the default term hasher.
    ///
    /// Query-time hashing must use the same seed.
    #[serde(default)]
    pub hash_seed: u64,
}

fn default_partition_size() -> usize {
    DEFAULT_PARTITION_SIZE
}

fn default_codec() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_min_token_len() -> usize {
    1
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            partition_size: default_partition_size(),
            codec: default_codec(),
            batch_size: default_batch_size(),
            min_token_len: default_min_token_len(),
            hash_seed: 0,
        }
    }
}

impl IndexConfig {
    /// Small partitions so tests exercise multi-partition merges
    pub fn for_testing() -> Self {
        Self {
            partition_size: 2,
            batch_size: 3,
            ..Self::default()
        }
    }

    /// Set the partition size
    pub fn with_partition_size(mut self, partition_size: usize) -> Self {
        self.partition_size = partition_size;
        self
    }

    /// Set the codec scheme
    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the minimum token length
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    /// Set the hasher seed
    pub fn with_hash_seed(mut self, hash_seed: u64) -> Self {
        self.hash_seed = hash_seed;
        self
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero partition or batch size, or an
    /// unregistered codec scheme.
    pub fn validate(&self) -> Result<()> {
        if self.partition_size == 0 {
            return Err(Error::Config("partition_size must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if !is_supported(&self.codec) {
            return Err(Error::Config(format!(
                "Unknown codec '{}'. Expected one of: {}",
                self.codec,
                SUPPORTED_SCHEMES.join(", ")
            )));
        }
        Ok(())
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: IndexConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
