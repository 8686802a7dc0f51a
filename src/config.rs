use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REGIONAL_LANGUAGE: &str = "ko";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process-wide settings, read once at startup and handed to whatever needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: String,
    pub image_base_url: String,
    pub regional_language: String,
    pub regional_region: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = read("TMDB_API_URL").ok_or(ConfigError::Missing("TMDB_API_URL"))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "TMDB_API_URL",
                reason: format!("expected an http(s) URL, got '{}'", api_base_url),
            });
        }
        let api_key = read("TMDB_API_KEY").ok_or(ConfigError::Missing("TMDB_API_KEY"))?;

        let image_base_url =
            read("TMDB_IMAGE_BASE_URL").unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string());
        let regional_language =
            read("REGIONAL_LANGUAGE").unwrap_or_else(|| DEFAULT_REGIONAL_LANGUAGE.to_string());
        let regional_region = read("REGIONAL_REGION");

        let bind_raw = read("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            regional_language,
            regional_region,
            bind_addr,
        })
    }
}
