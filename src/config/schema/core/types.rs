use super::super::{GatewayConfig, HistoryConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process-lifetime configuration.
///
/// Built once at startup (file, then environment overrides, then validation)
/// and shared read-only behind an `Arc`. Nothing mutates it after `main` hands
/// it to the gateway or the CLI commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Overrides the provider's built-in chat-completions base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Round-trip limit for one model call; must stay below the gateway timeout
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_provider() -> String {
    "groq".into()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_provider_timeout_secs() -> u64 {
    25
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let mailtone_dir = home.join(".mailtone");

        Self {
            data_dir: mailtone_dir.clone(),
            config_path: mailtone_dir.join("config.toml"),
            api_key: None,
            default_provider: default_provider(),
            base_url: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            provider_timeout_secs: default_provider_timeout_secs(),
            gateway: GatewayConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within 0.0..=2.0 (got {})",
                self.default_temperature
            )));
        }
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_model cannot be empty".into(),
            ));
        }
        if self.default_provider.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_provider cannot be empty".into(),
            ));
        }
        if self.provider_timeout_secs == 0
            || self.provider_timeout_secs >= self.gateway.request_timeout_secs
        {
            return Err(ConfigError::Validation(format!(
                "provider_timeout_secs must be between 1 and gateway.request_timeout_secs - 1 (got {} vs {})",
                self.provider_timeout_secs, self.gateway.request_timeout_secs
            )));
        }
        Ok(())
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.history.database_path(&self.data_dir)
    }
}
