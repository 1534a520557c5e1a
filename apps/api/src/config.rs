use std::time::Duration;

use anyhow::{Context, Result};

use crate::corpus::source::FetchPolicy;

pub const DEFAULT_PROTOCOL_URL: &str = "https://protocol.bryanjohnson.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the protocol page; section anchors hang off it.
    pub protocol_url: String,
    pub corpus_fetch_timeout_secs: u64,
    pub corpus_fetch_max_attempts: u32,
    pub corpus_fetch_backoff_ms: u64,
    pub corpus_fetch_max_backoff_ms: u64,
    /// JSON file overriding the built-in routine template.
    pub routine_template_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            protocol_url: std::env::var("PROTOCOL_URL")
                .unwrap_or_else(|_| DEFAULT_PROTOCOL_URL.to_string()),
            corpus_fetch_timeout_secs: parse_env("CORPUS_FETCH_TIMEOUT_SECS", 10)?,
            corpus_fetch_max_attempts: parse_env("CORPUS_FETCH_MAX_ATTEMPTS", 3)?,
            corpus_fetch_backoff_ms: parse_env("CORPUS_FETCH_BACKOFF_MS", 500)?,
            corpus_fetch_max_backoff_ms: parse_env("CORPUS_FETCH_MAX_BACKOFF_MS", 30_000)?,
            routine_template_path: std::env::var("ROUTINE_TEMPLATE_PATH").ok(),
        })
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(self.corpus_fetch_timeout_secs),
            max_attempts: self.corpus_fetch_max_attempts,
            backoff: Duration::from_millis(self.corpus_fetch_backoff_ms),
            max_backoff: Duration::from_millis(self.corpus_fetch_max_backoff_ms),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
