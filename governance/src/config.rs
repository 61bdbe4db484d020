//! Coordinator configuration with TOML file support.

use esm_types::constants::{GOVERNANCE_TOKEN, LIVENESS_CONTRACT, STAKING_CONTRACT};
use esm_utils::{LogFormat, LoggingError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for a [`ShutdownCoordinator`](crate::ShutdownCoordinator).
///
/// Can be loaded from a TOML file via [`EsmConfig::from_toml_file`] or built
/// programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsmConfig {
    /// Name under which the shutdown contract is resolved.
    #[serde(default = "default_staking_contract")]
    pub staking_contract: String,

    /// Name under which the liveness contract is resolved.
    #[serde(default = "default_liveness_contract")]
    pub liveness_contract: String,

    /// Symbol of the staked governance token.
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_staking_contract() -> String {
    STAKING_CONTRACT.to_string()
}

fn default_liveness_contract() -> String {
    LIVENESS_CONTRACT.to_string()
}

fn default_token_symbol() -> String {
    GOVERNANCE_TOKEN.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EsmConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        esm_utils::init_tracing(self.log_format, &self.log_level)
    }
}

impl Default for EsmConfig {
    fn default() -> Self {
        Self {
            staking_contract: default_staking_contract(),
            liveness_contract: default_liveness_contract(),
            token_symbol: default_token_symbol(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EsmConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = EsmConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = EsmConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.staking_contract, "ESM");
        assert_eq!(config.liveness_contract, "END");
        assert_eq!(config.token_symbol, "MKR");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            staking_contract = "ESM_V2"
            log_format = "json"
        "#;
        let config = EsmConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.staking_contract, "ESM_V2");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.liveness_contract, "END"); // default
    }

    #[test]
    fn unknown_log_format_is_a_parse_error() {
        let err = EsmConfig::from_toml_str(r#"log_format = "xml""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"token_symbol = "GOV""#).unwrap();
        let config = EsmConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.token_symbol, "GOV");
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = EsmConfig::from_toml_file("/nonexistent/esm.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
