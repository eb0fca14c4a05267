/// CLI configuration
use crate::error::{CliError, Result};
use podcast_client::{AssetAccess, ClientConfig};
use podcast_playback::{PlaybackRate, SessionConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Default config file name (without extension), looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "podcast";

/// Environment variable prefix (`PODCAST_SERVICE__URL`, `PODCAST_PLAYBACK__VOLUME`, ...)
pub const ENV_PREFIX: &str = "PODCAST";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_audio_bucket")]
    pub audio_bucket: String,

    #[serde(default = "default_cover_bucket")]
    pub cover_bucket: String,

    /// Buckets are public; otherwise every asset URL is signed
    #[serde(default)]
    pub public_assets: bool,

    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default = "default_rate")]
    pub rate: f32,

    #[serde(default)]
    pub repeat: bool,

    /// Headless clock granularity
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// With `path`, that file must exist. Without it, `podcast.toml` (or any
    /// format the `config` crate knows) is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppConfig::load`], reading variables from `env` instead of the process environment
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        // Override with environment variables (prefixed with PODCAST_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env.map(|vars| vars.into_iter().collect())),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.service.url.trim().is_empty() {
            return Err(CliError::Config(
                "service URL is required (set PODCAST_SERVICE__URL)".to_string(),
            ));
        }

        if self.service.api_key.trim().is_empty() {
            return Err(CliError::Config(
                "API key is required (set PODCAST_SERVICE__API_KEY)".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(CliError::Config(format!(
                "playback volume must be between 0 and 1, got {}",
                self.playback.volume
            )));
        }

        parse_rate(self.playback.rate)?;

        if self.playback.tick_ms == 0 {
            return Err(CliError::Config("playback tick_ms must be positive".to_string()));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.service.url, &self.service.api_key)
            .with_buckets(&self.service.audio_bucket, &self.service.cover_bucket)
            .with_timeout(Duration::from_secs(self.service.timeout_secs));
        if let Some(token) = &self.service.access_token {
            config = config.with_access_token(token);
        }
        config
    }

    pub fn asset_access(&self) -> AssetAccess {
        if self.service.public_assets {
            AssetAccess::Public
        } else {
            AssetAccess::Signed {
                expires_in: Duration::from_secs(self.service.signed_url_ttl_secs),
            }
        }
    }

    pub fn session_config(&self) -> Result<SessionConfig> {
        Ok(SessionConfig {
            volume: self.playback.volume,
            rate: parse_rate(self.playback.rate)?,
            repeat: self.playback.repeat,
        })
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.playback.tick_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.playback.search_debounce_ms)
    }
}

/// Map a multiplier onto the fixed rate set
pub fn parse_rate(multiplier: f32) -> Result<PlaybackRate> {
    PlaybackRate::from_multiplier(multiplier).ok_or_else(|| {
        CliError::Config(format!(
            "playback rate must be one of 1, 1.25, 1.5, 1.75, 2; got {}",
            multiplier
        ))
    })
}

// Default values
impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            access_token: None,
            audio_bucket: default_audio_bucket(),
            cover_bucket: default_cover_bucket(),
            public_assets: false,
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            rate: default_rate(),
            repeat: false,
            tick_ms: default_tick_ms(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_audio_bucket() -> String {
    "audio".to_string()
}

fn default_cover_bucket() -> String {
    "covers".to_string()
}

fn default_signed_url_ttl_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_volume() -> f32 {
    0.8
}

fn default_rate() -> f32 {
    1.0
}

fn default_tick_ms() -> u64 {
    250
}

fn default_search_debounce_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        let file = write_config(
            r#"
            [service]
            url = "https://svc.example.com"
            api_key = "anon"
            "#,
        );

        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        config.validate().unwrap();

        assert_eq!(config.service.audio_bucket, "audio");
        assert_eq!(config.service.cover_bucket, "covers");
        assert!(!config.service.public_assets);
        assert_eq!(config.service.signed_url_ttl_secs, 3600);
        assert_eq!(config.playback.volume, 0.8);
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(
            config.asset_access(),
            AssetAccess::Signed {
                expires_in: Duration::from_secs(3600)
            }
        );
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config(
            r#"
            [service]
            url = "https://svc.example.com"
            api_key = "anon"

            [playback]
            rate = 1.5
            "#,
        );

        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("PODCAST_SERVICE__URL", "https://other.example.com"),
                ("PODCAST_SERVICE__PUBLIC_ASSETS", "true"),
                ("PODCAST_PLAYBACK__VOLUME", "0.25"),
            ]),
        )
        .unwrap();

        assert_eq!(config.service.url, "https://other.example.com");
        assert_eq!(config.asset_access(), AssetAccess::Public);
        assert_eq!(config.playback.volume, 0.25);

        let session = config.session_config().unwrap();
        assert_eq!(session.rate, PlaybackRate::X1_5);
        assert_eq!(session.volume, 0.25);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_with_env(Some(Path::new("/nonexistent/podcast.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err(), "URL and key are required");

        config.service.url = "https://svc.example.com".into();
        config.service.api_key = "anon".into();
        config.validate().unwrap();

        config.playback.volume = 1.5;
        assert!(config.validate().is_err());
        config.playback.volume = 0.5;

        config.playback.rate = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn client_config_carries_service_settings() {
        let mut config = AppConfig::default();
        config.service.url = "https://svc.example.com".into();
        config.service.api_key = "anon".into();
        config.service.access_token = Some("jwt".into());
        config.service.timeout_secs = 5;

        let client = config.client_config();
        assert_eq!(client.url, "https://svc.example.com");
        assert_eq!(client.access_token.as_deref(), Some("jwt"));
        assert_eq!(client.timeout, Duration::from_secs(5));
    }
}
