//! Processor configuration.
//!
//! An optional TOML file passed with `--config`. Every key is optional and
//! missing keys keep the stock defaults:
//!
//! ```toml
//! [processing]
//! max_threads = 4            # Worker threads (omit for all CPU cores)
//!
//! [pipeline]
//! unknown_filters = "skip"   # "skip" reports and ignores, "error" aborts
//!
//! [output]
//! update_header_sizes = false  # Recompute file_size and image_size on save
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    pub processing: ProcessingConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

impl ProcessorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upper bound on filter worker threads. `None` means all cores;
    /// larger values are clamped to the core count.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub unknown_filters: UnknownFilters,
}

/// What to do with a filter name that matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFilters {
    /// Report it and carry on with the remaining filters.
    #[default]
    Skip,
    /// Abort before any filter runs.
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Recompute the header's `file_size` and `image_size` from the final
    /// dimensions. Off by default: decoded header values are written back
    /// as they were read.
    pub update_header_sizes: bool,
}

/// Load and validate a config file, or return defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<ProcessorConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ProcessorConfig::default());
    };
    let content = fs::read_to_string(path)?;
    let config: ProcessorConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
