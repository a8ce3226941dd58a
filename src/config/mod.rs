//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::models::Player;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing API credential: set the {0} environment variable")]
    MissingCredential(String),
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Delay between consecutive players during a roster refresh
    #[serde(default = "default_pacing")]
    pub pacing_ms: u64,

    /// Matches requested per player
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Optional provider-side mode filter, e.g. "custom"
    #[serde(default)]
    pub mode_filter: Option<String>,
}

fn default_base_url() -> String {
    "https://api.henrikdev.xyz".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_pacing() -> u64 {
    1000
}

fn default_page_size() -> u32 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            pacing_ms: default_pacing(),
            page_size: default_page_size(),
            mode_filter: None,
        }
    }
}

impl UpstreamConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

/// Cache lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_roster_ttl")]
    pub roster_ttl_seconds: u64,

    #[serde(default = "default_player_ttl")]
    pub player_ttl_seconds: u64,
}

fn default_roster_ttl() -> u64 {
    1800
}

fn default_player_ttl() -> u64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            roster_ttl_seconds: default_roster_ttl(),
            player_ttl_seconds: default_player_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn roster_ttl(&self) -> Duration {
        Duration::from_secs(self.roster_ttl_seconds)
    }

    pub fn player_ttl(&self) -> Duration {
        Duration::from_secs(self.player_ttl_seconds)
    }
}

/// Match classification policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Mode labels counted as ranked, compared case-insensitively
    #[serde(default = "default_ranked_modes")]
    pub ranked_modes: Vec<String>,

    /// Minimum combined rounds for a custom game to count as a scrim
    #[serde(default = "default_scrim_min_rounds")]
    pub scrim_min_rounds: u32,

    /// Minimum distinct roster members for a team match
    #[serde(default = "default_team_min_members")]
    pub team_min_members: usize,
}

fn default_ranked_modes() -> Vec<String> {
    vec!["competitive".to_string()]
}

fn default_scrim_min_rounds() -> u32 {
    13
}

fn default_team_min_members() -> usize {
    3
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ranked_modes: default_ranked_modes(),
            scrim_min_rounds: default_scrim_min_rounds(),
            team_min_members: default_team_min_members(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Background roster refresher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefresherConfig {
    #[serde(default = "default_refresher_enabled")]
    pub enabled: bool,

    /// Interval string, e.g. "30m"
    #[serde(default = "default_refresher_interval")]
    pub interval: String,
}

fn default_refresher_enabled() -> bool {
    true
}

fn default_refresher_interval() -> String {
    "30m".to_string()
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            enabled: default_refresher_enabled(),
            interval: default_refresher_interval(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider region: na, eu, ap, kr, latam, br
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub refresher: RefresherConfig,

    #[serde(default)]
    pub roster: Vec<Player>,
}

fn default_region() -> String {
    "na".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_key_env() -> String {
    "HENRIK_KEY".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            log_level: default_log_level(),
            api_key_env: default_api_key_env(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            classifier: ClassifierConfig::default(),
            server: ServerConfig::default(),
            refresher: RefresherConfig::default(),
            roster: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::ValidationError(
                "Roster must contain at least one player".to_string(),
            ));
        }

        if let Some(p) = self
            .roster
            .iter()
            .find(|p| p.name.trim().is_empty() || p.tag.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "Roster entry {:?} needs both a name and a tag",
                p.riot_id()
            )));
        }

        if self.region.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Region must not be empty".to_string(),
            ));
        }

        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.upstream.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream page size must be greater than 0".to_string(),
            ));
        }

        if self.classifier.ranked_modes.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one ranked mode is required".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let interval = crate::parse_duration(&self.refresher.interval);
        if self.refresher.enabled && interval.map_or(true, |d| d.is_zero()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid refresher interval: {}",
                self.refresher.interval
            )));
        }

        Ok(())
    }

    /// Read the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        Self::api_key_from(&self.api_key_env, std::env::var(&self.api_key_env).ok())
    }

    fn api_key_from(var: &str, value: Option<String>) -> Result<String, ConfigError> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ConfigError::MissingCredential(var.to_string())),
        }
    }
}
