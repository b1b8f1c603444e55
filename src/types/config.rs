//! Configuration structures.
//!
//! Configuration is loaded from a JSON config file and environment variables.
//! Environment values override file values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::errors::{Error, Result};

/// Environment variable holding the payload encryption passphrase.
pub const ENV_ENCRYPTION_KEY: &str = "WAYPOINT_ENCRYPTION_KEY";
/// Environment variable overriding the stream input cap.
pub const ENV_MAX_INPUT_BYTES: &str = "WAYPOINT_MAX_INPUT_BYTES";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "WAYPOINT_LOG_LEVEL";
/// Environment variable selecting log output format (`json` or `text`).
pub const ENV_LOG_FORMAT: &str = "WAYPOINT_LOG_FORMAT";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Codec limits.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Payload encryption.
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_ENCRYPTION_KEY) {
            self.encryption.key = if key.is_empty() { None } else { Some(key) };
        }
        if let Some(raw) = lookup(ENV_MAX_INPUT_BYTES) {
            self.codec.max_input_bytes = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} must be a byte count, got {:?}", ENV_MAX_INPUT_BYTES, raw))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.codec.max_input_bytes == 0 {
            return Err(Error::config("codec.max_input_bytes must be positive"));
        }
        Ok(())
    }
}

/// Codec limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum accepted size of a stream input in bytes.
    pub max_input_bytes: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: crate::codec::DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Payload encryption configuration.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct EncryptionConfig {
    /// Shared passphrase. Absent or empty disables payload encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl EncryptionConfig {
    pub fn is_configured(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_leave_encryption_off() {
        let config = Config::default();
        assert!(!config.encryption.is_configured());
        assert_eq!(config.codec.max_input_bytes, 5 * 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn env_overrides_file_values() {
        let config = Config::default()
            .apply_vars(vars(&[
                (ENV_ENCRYPTION_KEY, "hunter2"),
                (ENV_MAX_INPUT_BYTES, "1024"),
                (ENV_LOG_FORMAT, "JSON"),
            ]))
            .unwrap();
        assert!(config.encryption.is_configured());
        assert_eq!(config.codec.max_input_bytes, 1024);
        assert!(config.observability.json_logs);
    }

    #[test]
    fn empty_key_disables_encryption() {
        let mut config = Config::default();
        config.encryption.key = Some("secret".into());
        let config = config.apply_vars(vars(&[(ENV_ENCRYPTION_KEY, "")])).unwrap();
        assert!(!config.encryption.is_configured());
    }

    #[test]
    fn rejects_bad_byte_count() {
        let err = Config::default()
            .apply_vars(vars(&[(ENV_MAX_INPUT_BYTES, "lots")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"encryption": {{"key": "abc"}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.encryption.key.as_deref(), Some("abc"));
        assert_eq!(config.codec.max_input_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn debug_redacts_key() {
        let config = EncryptionConfig {
            key: Some("topsecret".into()),
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("topsecret"));
    }
}
