use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dog_api_url: String,
    pub session_timeout_seconds: u64,
    pub cleanup_interval_seconds: u64,
    pub rate_limit_max_tokens: u32,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    /// for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            dog_api_url: lookup("DOG_API_URL").unwrap_or(defaults.dog_api_url),
            session_timeout_seconds: parse_or(
                &lookup,
                "SESSION_TIMEOUT_SECONDS",
                defaults.session_timeout_seconds,
            )?,
            cleanup_interval_seconds: parse_or(
                &lookup,
                "CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            )?,
            rate_limit_max_tokens: parse_or(
                &lookup,
                "RATE_LIMIT_MAX_TOKENS",
                defaults.rate_limit_max_tokens,
            )?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dog_api_url: DEFAULT_DOG_API_URL.to_string(),
            session_timeout_seconds: 1800,
            cleanup_interval_seconds: 30,
            rate_limit_max_tokens: 30,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", key, value)),
        None => Ok(default),
    }
}
