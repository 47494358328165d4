//! Lock configuration
//!
//! Every key is optional. A complete file looks like:
//!
//! ```toml
//! timeout_secs = 2.5
//! poll_interval_ms = 50
//! on_timeout = "abort"   # or "force"
//! ```

use std::fs;
use std::path::Path;

mod error;
mod model;

pub use error::ConfigError;
pub use model::{LockConfig, TimeoutPolicy};

impl LockConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LockConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.on_timeout, TimeoutPolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = LockConfig::from_toml_str("").unwrap();
        assert_eq!(config, LockConfig::default());
    }

    #[test]
    fn test_fractional_timeout() {
        let config = LockConfig::from_toml_str(
            r#"
timeout_secs = 0.25
on_timeout = "force"
"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.on_timeout, TimeoutPolicy::Force);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = LockConfig::from_toml_str("retries = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = LockConfig::from_toml_str(r#"on_timeout = "ask""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let result = LockConfig::from_toml_str("timeout_secs = -1.0");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "timeout_secs"),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = LockConfig::from_toml_str("poll_interval_ms = 0");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "poll_interval_ms")
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unvalidated_timeout_never_panics() {
        let mut config = LockConfig {
            timeout_secs: -3.0,
            ..LockConfig::default()
        };
        assert_eq!(config.timeout(), Duration::ZERO);

        config.timeout_secs = f64::INFINITY;
        assert_eq!(config.timeout(), Duration::MAX);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lock.toml");
        fs::write(&path, "timeout_secs = 1.5\npoll_interval_ms = 20\n").unwrap();

        let config = LockConfig::load(&path).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.poll_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");

        let err = LockConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }
}
