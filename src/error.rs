//! Error types.
//!
//! The particle simulation itself is infallible; only loading effect tuning
//! from disk can fail.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating an [`EffectsConfig`](crate::config::EffectsConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read effects config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON for an effects config.
    #[error("malformed effects config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed fine but cannot drive the simulation.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: String, reason: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: &'static str) -> Self {
        Self::Invalid {
            field: field.into(),
            reason,
        }
    }
}
