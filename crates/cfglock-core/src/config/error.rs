use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG_READ_ERROR: failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CONFIG_PARSE_ERROR: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
