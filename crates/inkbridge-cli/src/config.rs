//! CLI configuration management

use inkbridge_sdk::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CliError;

/// Default log filter when neither `RUST_LOG` nor `--log-level` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// CLI configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter directive
    pub log_level: String,
    /// Client settings passed to the SDK
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".inkbridge"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load `path`, or the default location; a missing file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::config_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save to `path`, or the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, CliError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or_else(|| CliError::Config("cannot determine config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Set a single setting by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CliError> {
        let client = &mut self.client;
        match key {
            "log_level" => self.log_level = value.to_string(),
            "rpc_url" => client.rpc_url = value.to_string(),
            "metadata" => client.metadata = value.to_string(),
            "app_name" => client.app_name = value.to_string(),
            "query_origin" => {
                client.query_origin = match value {
                    "" | "none" => None,
                    origin => Some(origin.to_string()),
                }
            }
            "ss58_prefix" => client.ss58_prefix = parse_number(key, value)?,
            "weight.ref_time" => client.weight.ref_time = parse_number(key, value)?,
            "weight.proof_size" => client.weight.proof_size = parse_number(key, value)?,
            "contracts.pallet_index" => client.contracts.pallet_index = parse_number(key, value)?,
            "contracts.call_index" => client.contracts.call_index = parse_number(key, value)?,
            other => return Err(CliError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value
        .replace('_', "")
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("{} expects a number, got {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.client.rpc_url, "ws://127.0.0.1:9944");
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            log_level = "debug"

            [client]
            rpc_url = "http://example.com:9933"

            [client.weight]
            proof_size = 65536
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.client.rpc_url, "http://example.com:9933");
        assert_eq!(config.client.weight.proof_size, 65_536);
        assert_eq!(config.client.ss58_prefix, 42);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("rpc_url", "wss://rpc.example.com").unwrap();
        config.set("weight.ref_time", "1_000_000").unwrap();
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.client.weight.ref_time, 1_000_000);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(config.set("chain_id", "1"), Err(CliError::UnknownKey(_))));
        assert!(matches!(
            config.set("ss58_prefix", "abc"),
            Err(CliError::InvalidInput(_))
        ));
        config.set("query_origin", "none").unwrap();
        assert_eq!(config.client.query_origin, None);
    }
}
