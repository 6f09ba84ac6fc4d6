use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::profile::draft::DEFAULT_COMMUNES;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "SERVIMATCH_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Nominatim-compatible geocoding service
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// User-Agent sent to the geocoding service
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Communes offered on the address step
    #[serde(default = "default_communes")]
    pub communes: Vec<String>,
    /// Commune preselected for a new draft
    #[serde(default = "default_commune")]
    pub default_commune: String,
    /// Seconds between notification badge polls
    #[serde(default = "default_notification_poll_secs")]
    pub notification_poll_secs: u64,
    /// Delay after the last keystroke before an address lookup
    #[serde(default = "default_autocomplete_debounce_ms")]
    pub autocomplete_debounce_ms: u64,
    /// Color theme: "dark" or "light"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "ServimatchApp/1.0".to_string()
}

fn default_communes() -> Vec<String> {
    DEFAULT_COMMUNES.iter().map(|c| c.to_string()).collect()
}

fn default_commune() -> String {
    DEFAULT_COMMUNES[0].to_string()
}

fn default_notification_poll_secs() -> u64 {
    5
}

fn default_autocomplete_debounce_ms() -> u64 {
    500
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            geocoding_url: default_geocoding_url(),
            user_agent: default_user_agent(),
            communes: default_communes(),
            default_commune: default_commune(),
            notification_poll_secs: default_notification_poll_secs(),
            autocomplete_debounce_ms: default_autocomplete_debounce_ms(),
            theme: default_theme(),
        }
    }
}

/// Strip whitespace and trailing slashes so paths can be appended with `format!`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Config {
    /// Load configuration from file or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let mut config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            config.normalize();
            debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            debug!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        crate::utils::write_private_file(config_path, &content)
    }

    /// Apply the command-line flag, then the environment, over the file value.
    pub fn apply_overrides(&mut self, api_url: Option<&str>) {
        let env_url = std::env::var(API_URL_ENV).ok();
        self.apply_overrides_from(api_url, env_url.as_deref());
    }

    fn apply_overrides_from(&mut self, flag: Option<&str>, env: Option<&str>) {
        if let Some(url) = flag.or(env).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = normalize_base_url(url);
        }
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_base_url(&self.api_base_url);
        self.geocoding_url = normalize_base_url(&self.geocoding_url);
        if self.communes.is_empty() {
            warn!("Config has no communes, using defaults");
            self.communes = default_communes();
        }
        if !self.communes.contains(&self.default_commune) {
            self.default_commune = self.communes[0].clone();
        }
        if self.notification_poll_secs == 0 {
            self.notification_poll_secs = default_notification_poll_secs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.user_agent, "ServimatchApp/1.0");
        assert_eq!(config.communes.len(), 7);
        assert_eq!(config.default_commune, "Santiago");
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.api_base_url = "https://api.servimatch.cl".to_string();
        config.save(&config_path).unwrap();

        let loaded = Config::load_or_create(&config_path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_missing_config_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_is_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "api_base_url = \"http://10.0.2.2:8000/ \"\ncommunes = [\"Maipú\"]\nnotification_poll_secs = 0\n",
        )
        .unwrap();

        let config = Config::load_or_create(&config_path).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.2.2:8000");
        assert_eq!(config.default_commune, "Maipú");
        assert_eq!(config.notification_poll_secs, 5);
        assert_eq!(config.autocomplete_debounce_ms, 500);
    }

    #[test]
    fn test_flag_wins_over_env() {
        let mut config = Config::default();
        config.apply_overrides_from(Some("http://flag/"), Some("http://env"));
        assert_eq!(config.api_base_url, "http://flag");

        config.apply_overrides_from(None, Some("http://env"));
        assert_eq!(config.api_base_url, "http://env");

        config.apply_overrides_from(None, Some("  "));
        assert_eq!(config.api_base_url, "http://env");
    }

    #[cfg(unix)]
    #[test]
    fn test_config_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Config::default().save(&config_path).unwrap();
        let mode = std::fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
