use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

/// Where and how the report is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// The Kandilli plain-text report
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Same-origin relay (see `quake-relay`)
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Public CORS relay; the encoded upstream URL is appended to it
    #[serde(default = "default_public_relay_url")]
    pub public_relay_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound for a single stage
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,

    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3031
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_upstream_url() -> String {
    "http://www.koeri.boun.edu.tr/scripts/lst0.asp".to_string()
}

fn default_relay_url() -> String {
    "http://127.0.0.1:3030/api/kandilli".to_string()
}

fn default_public_relay_url() -> String {
    "https://api.allorigins.win/raw?url=".to_string()
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_stage_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            acquisition: AcquisitionConfig::default(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            relay_url: default_relay_url(),
            public_relay_url: default_public_relay_url(),
            user_agent: default_user_agent(),
            stage_timeout_secs: default_stage_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl AcquisitionConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

impl BackendConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BackendConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub static CONFIG: OnceLock<BackendConfig> = OnceLock::new();

/// Load `path` into [`CONFIG`]. A missing file means defaults.
pub fn read_config(path: &str) -> anyhow::Result<&'static BackendConfig> {
    let config = if Path::new(path).exists() {
        BackendConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path, e))?
    } else {
        eprintln!("Config file {} not found, using defaults", path);
        BackendConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: BackendConfig = toml::from_str("").unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:3031");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.acquisition.stage_timeout(), Duration::from_secs(10));
        assert_eq!(config.acquisition.refresh_interval(), Duration::from_secs(60));
        assert!(config.acquisition.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_partial_acquisition_section() {
        let config: BackendConfig = toml::from_str(
            r#"
            port = 8080
            log_level = "debug"

            [acquisition]
            relay_url = "http://localhost:9000/api/kandilli"
            stage_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.acquisition.relay_url, "http://localhost:9000/api/kandilli");
        assert_eq!(config.acquisition.stage_timeout(), Duration::from_secs(5));
        assert_eq!(config.acquisition.upstream_url, default_upstream_url());
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let config = AcquisitionConfig {
            stage_timeout_secs: 0,
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.stage_timeout(), Duration::from_secs(1));
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }
}
