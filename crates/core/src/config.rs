//! Configuration management
//!
//! This module handles loading the bcp configuration file.
//! The configuration file is stored in TOML format at ~/.config/bcp/config.toml.
//!
//! PROTECTED FILE: Changes to schema_version require migration support.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Object store connection settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Connection settings for the S3-compatible service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Endpoint URL; the SDK's own resolution is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Static access key; the default credential chain is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Static secret key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Bucket lookup style: "auto", "path", or "dns"
    #[serde(default = "default_bucket_lookup")]
    pub bucket_lookup: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket_lookup() -> String {
    "auto".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            access_key: None,
            secret_key: None,
            bucket_lookup: default_bucket_lookup(),
        }
    }
}

impl RemoteConfig {
    /// Check the endpoint URL, the lookup style and that keys come in pairs
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)?;
        }

        if !matches!(self.bucket_lookup.as_str(), "auto" | "path" | "dns") {
            return Err(Error::Config(format!(
                "bucket_lookup must be auto, path or dns, got '{}'",
                self.bucket_lookup
            )));
        }

        match (&self.access_key, &self.secret_key) {
            (Some(_), None) | (None, Some(_)) => Err(Error::Config(
                "access_key and secret_key must be set together".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Static credentials, if both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(a), Some(s)) => Some((a, s)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            remote: RemoteConfig::default(),
        }
    }
}

/// Configuration manager handles loading config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        let config_path = config_dir.join("bcp").join("config.toml");
        Ok(Self { config_path })
    }

    /// Create a ConfigManager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade bcp.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.remote.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let manager = ConfigManager::with_path(config_path);
        (manager, temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.remote.region, "us-east-1");
        assert_eq!(config.remote.bucket_lookup, "auto");
        assert!(config.remote.endpoint.is_none());
        assert!(config.remote.static_credentials().is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (manager, _temp_dir) = temp_config_manager();
        let config = manager.load().unwrap();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.remote, RemoteConfig::default());
    }

    #[test]
    fn test_load_remote_section() {
        let (manager, _temp_dir) = temp_config_manager();
        std::fs::write(
            manager.config_path(),
            r#"
            schema_version = 1

            [remote]
            endpoint = "http://localhost:9000"
            access_key = "accesskey"
            secret_key = "secretkey"
            bucket_lookup = "path"
            "#,
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert_eq!(
            config.remote.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.remote.region, "us-east-1");
        assert_eq!(
            config.remote.static_credentials(),
            Some(("accesskey", "secretkey"))
        );
    }

    #[test]
    fn test_schema_version_too_new() {
        let (manager, _temp_dir) = temp_config_manager();

        let content = format!(
            r#"
            schema_version = {}
            "#,
            SCHEMA_VERSION + 1
        );
        std::fs::write(manager.config_path(), content).unwrap();

        let result = manager.load();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("newer than supported")
        );
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let remote = RemoteConfig {
            endpoint: Some("not a url".into()),
            ..Default::default()
        };
        assert!(matches!(remote.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_half_credentials() {
        let remote = RemoteConfig {
            access_key: Some("a".into()),
            ..Default::default()
        };
        assert!(matches!(remote.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_lookup() {
        let remote = RemoteConfig {
            bucket_lookup: "virtual".into(),
            ..Default::default()
        };
        assert!(remote.validate().is_err());
    }
}
