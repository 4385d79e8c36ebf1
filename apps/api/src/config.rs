use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// CSV loaded into the dataset store at startup.
    pub sample_dataset_path: Option<PathBuf>,
    /// Base URL of the remote job-demand service.
    pub market_api_url: Option<String>,
    pub histogram_buckets: NonZeroUsize,
    /// Truncation for city/role rankings and the top-skills list.
    pub top_n: NonZeroUsize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            sample_dataset_path: optional_env("SAMPLE_DATASET_PATH").map(PathBuf::from),
            market_api_url: optional_env("MARKET_API_URL"),
            histogram_buckets: parse_env("HISTOGRAM_BUCKETS", default_count(6))?,
            top_n: parse_env("TOP_N", default_count(8))?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            sample_dataset_path: None,
            market_api_url: None,
            histogram_buckets: default_count(6),
            top_n: default_count(8),
        }
    }
}

fn default_count(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
    }
}
