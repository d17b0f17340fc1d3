use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default MEXC REST endpoint.
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://api.mexc.com";
/// Default per-request HTTP timeout (seconds).
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Top-level config (tickwatch.toml + TICKWATCH_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot API token. May be left empty in the file and supplied via the
    /// BOT_TOKEN env var instead (checked by the binary).
    #[serde(default)]
    pub bot_token: String,
    /// Allowlist of Telegram usernames (with or without `@`) or numeric user
    /// IDs. `"*"` allows everyone. An empty list also allows everyone — this
    /// is a single-purpose bot and a fresh install must be usable before any
    /// config exists.
    #[serde(default)]
    pub allow_users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the price API (no trailing slash).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_SOURCE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_SOURCE_TIMEOUT_SECS
}

impl AppConfig {
    /// Load config from a TOML file with TICKWATCH_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.tickwatch/tickwatch.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: AppConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("TICKWATCH_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.tickwatch/tickwatch.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_mexc() {
        let config = AppConfig::default();
        assert_eq!(config.source.base_url, DEFAULT_SOURCE_BASE_URL);
        assert_eq!(config.source.timeout_secs, DEFAULT_SOURCE_TIMEOUT_SECS);
        assert!(config.telegram.bot_token.is_empty());
        assert!(config.telegram.allow_users.is_empty());
    }
}
