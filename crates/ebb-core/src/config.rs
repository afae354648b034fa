//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/ebb/config.toml)
//! 3. Environment variables (EBB_* prefix)
//!
//! Environment variables take precedence over config file values.
//!
//! Dictionary-API credentials live here as an explicit [`DictionaryConfig`]
//! handed to the lookup client; nothing reads them from globals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "EBB";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// User assumed when no --user flag is given
    #[serde(default)]
    pub default_user: Option<String>,

    /// Dictionary lookup service settings
    #[serde(default)]
    pub dictionary: DictionaryConfig,
}

/// Settings for the external dictionary-translation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// API key (client id)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret (client secret)
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Translation endpoint
    #[serde(default = "default_dict_endpoint")]
    pub endpoint: String,

    /// OAuth token endpoint
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            endpoint: default_dict_endpoint(),
            token_endpoint: default_token_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DictionaryConfig {
    /// True when both credentials are present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_user: None,
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (EBB_DATA_DIR, EBB_DEFAULT_USER,
    ///    EBB_DICT_API_KEY, EBB_DICT_API_SECRET)
    /// 2. Config file (~/.config/ebb/config.toml or EBB_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // EBB_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // EBB_DEFAULT_USER
        if let Ok(val) = std::env::var(format!("{}_DEFAULT_USER", ENV_PREFIX)) {
            self.default_user = if val.is_empty() { None } else { Some(val) };
        }

        // EBB_DICT_API_KEY
        if let Ok(val) = std::env::var(format!("{}_DICT_API_KEY", ENV_PREFIX)) {
            self.dictionary.api_key = if val.is_empty() { None } else { Some(val) };
        }

        // EBB_DICT_API_SECRET
        if let Ok(val) = std::env::var(format!("{}_DICT_API_SECRET", ENV_PREFIX)) {
            self.dictionary.api_secret = if val.is_empty() { None } else { Some(val) };
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with EBB_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ebb")
            .join("config.toml")
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("ebb.db")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ebb")
}

fn default_dict_endpoint() -> String {
    "https://aip.baidubce.com/rpc/2.0/mt/texttrans-with-dict/v1".to_string()
}

fn default_token_endpoint() -> String {
    "https://aip.baidubce.com/oauth/2.0/token".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "EBB_DATA_DIR",
        "EBB_DEFAULT_USER",
        "EBB_DICT_API_KEY",
        "EBB_DICT_API_SECRET",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.default_user.is_none());
        assert!(!config.dictionary.is_configured());
        assert!(config.data_dir.ends_with("ebb"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.sqlite_path().ends_with("ebb.db"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("EBB_DATA_DIR", "/tmp/ebb-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/ebb-test"));
    }

    #[test]
    fn test_env_override_credentials() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert!(!config.dictionary.is_configured());

        env::set_var("EBB_DICT_API_KEY", "key-123");
        env::set_var("EBB_DICT_API_SECRET", "secret-456");
        config.apply_env_overrides();

        assert!(config.dictionary.is_configured());
        assert_eq!(config.dictionary.api_key.as_deref(), Some("key-123"));

        // Empty string clears a credential
        env::set_var("EBB_DICT_API_SECRET", "");
        config.apply_env_overrides();
        assert!(!config.dictionary.is_configured());
    }

    #[test]
    fn test_env_override_default_user() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("EBB_DEFAULT_USER", "aran");
        config.apply_env_overrides();
        assert_eq!(config.default_user.as_deref(), Some("aran"));
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/ebb"),
            default_user: Some("aran".to_string()),
            dictionary: DictionaryConfig {
                api_key: Some("key".to_string()),
                api_secret: Some("secret".to_string()),
                ..DictionaryConfig::default()
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("[dictionary]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.default_user, config.default_user);
        assert_eq!(parsed.dictionary.api_key, config.dictionary.api_key);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            default_user = "aran"

            [dictionary]
            api_key = "key"
            api_secret = "secret"
            timeout_secs = 5
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.default_user.as_deref(), Some("aran"));
        assert!(config.dictionary.is_configured());
        assert_eq!(config.dictionary.timeout_secs, 5);
        // Endpoints keep their defaults when not set
        assert!(config.dictionary.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let _guard = EnvGuard::new(ENV_VARS);

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let config = Config {
            data_dir: dir.path().join("data"),
            default_user: Some("aran".to_string()),
            dictionary: DictionaryConfig::default(),
        };
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.default_user.as_deref(), Some("aran"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        env::set_var(
            "EBB_DATA_DIR",
            env::temp_dir().join("ebb-config-test").to_str().unwrap(),
        );

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert!(config.default_user.is_none());
        assert!(!config.dictionary.is_configured());
    }
}
