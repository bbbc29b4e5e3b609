use std::time::Duration;

use crate::registration::UsernameCharset;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FALLBACK_USER: &str = "edx@example.com";

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub app_env: String,
    pub enable_unicode_username: bool,
    pub validation_rate_limit: usize,
    pub validation_rate_window: Duration,
    pub fallback_user: String,
    pub db_max_connections: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "Missing required environment variable {var}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            app_env: lookup("APP_ENV").unwrap_or_else(|| "production".to_string()),
            enable_unicode_username: parse_or(&lookup, "ENABLE_UNICODE_USERNAME", false, parse_bool),
            validation_rate_limit: parse_or(&lookup, "VALIDATION_RATE_LIMIT", 100, |v| v.parse().ok()),
            validation_rate_window: Duration::from_secs(parse_or(
                &lookup,
                "VALIDATION_RATE_WINDOW_SECS",
                60,
                |v| v.parse().ok(),
            )),
            fallback_user: lookup("GENERATOR_FALLBACK_USER")
                .unwrap_or_else(|| DEFAULT_FALLBACK_USER.to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 8, |v| v.parse().ok()),
        })
    }

    pub fn is_development(&self) -> bool {
        is_development_env(&self.app_env)
    }

    pub fn username_charset(&self) -> UsernameCharset {
        if self.enable_unicode_username {
            UsernameCharset::Unicode
        } else {
            UsernameCharset::Ascii
        }
    }
}

/// `APP_ENV` values that count as a development environment.
pub fn is_development_env(app_env: &str) -> bool {
    matches!(app_env.trim().to_ascii_lowercase().as_str(), "development" | "dev")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_or<F, T, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
    T: std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => match parse(raw.trim()) {
            Some(v) => v,
            None => {
                log::warn!("Ignoring invalid {key}={raw:?}, using default {default:?}");
                default
            }
        },
    }
}
