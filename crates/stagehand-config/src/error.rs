use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The configuration file could not be read.
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The configuration text is not valid JSON for the expected shape.
  #[error("invalid schedule definition: {0}")]
  Parse(#[from] serde_json::Error),
}
