//! Application configuration loaded from environment variables
//!
//! `main` calls `dotenvy::dotenv()` first, so every variable below can also
//! come from a `.env` file.
//!
//! # Environment Variables
//!
//! - `PORT` - Server port number (default: 8080)
//! - `HISTORY_DB_PATH` - Path to the history database file (default: "history.db")
//! - `COUNTRIES_API_BASE` - REST Countries base URL (default: "https://restcountries.com/v3.1")
//! - `WEATHER_API_URL` - OpenWeatherMap current-weather endpoint
//! - `OPENWEATHERMAP_API_KEY` - Weather API key; weather lookups are disabled when unset or blank
//! - `UPSTREAM_TIMEOUT_SECS` - Timeout for each outbound HTTP call (default: 10)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_COUNTRIES_API_BASE: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse {key}: {message}")]
    Parse { key: &'static str, message: String },
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub history_db_path: String,
    pub countries_api_base: String,
    pub weather_api_url: String,
    /// `None` disables weather enrichment entirely
    pub weather_api_key: Option<String>,
    pub upstream_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults; a variable that is set
    /// but cannot be parsed is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_or("PORT", 8080)?,
            history_db_path: env_or("HISTORY_DB_PATH", "history.db".to_string())?,
            countries_api_base: env_or(
                "COUNTRIES_API_BASE",
                DEFAULT_COUNTRIES_API_BASE.to_string(),
            )?,
            weather_api_url: env_or("WEATHER_API_URL", DEFAULT_WEATHER_API_URL.to_string())?,
            weather_api_key: env::var("OPENWEATHERMAP_API_KEY")
                .ok()
                .and_then(non_blank),
            upstream_timeout: Duration::from_secs(env_or("UPSTREAM_TIMEOUT_SECS", 10)?),
        })
    }
}

fn env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse::<T>().map_err(|e| ConfigError::Parse {
            key,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// A blank credential counts as no credential.
pub fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
