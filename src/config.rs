//! Environment-based configuration
//!
//! Reads `STAT_XPLORE_*` variables. Binaries call `dotenvy::dotenv()` first so a
//! local `.env` file is honoured.

use std::time::Duration;

use url::Url;

use crate::error::{Result, StatXploreError};

pub const DEFAULT_BASE_URL: &str = "https://stat-xplore.dwp.gov.uk/webapi/rest/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_DEPTH: usize = 32;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
    /// Maximum folder depth the schema explorer descends to.
    pub max_depth: usize,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_depth: DEFAULT_MAX_DEPTH,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("STAT_XPLORE_API_KEY").unwrap_or_default();

        let base_url = match lookup("STAT_XPLORE_BASE_URL") {
            Some(raw) if !raw.trim().is_empty() => parse_base_url(&raw)?,
            _ => defaults.base_url,
        };

        let timeout = match lookup("STAT_XPLORE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("STAT_XPLORE_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        let max_depth = match lookup("STAT_XPLORE_MAX_DEPTH") {
            Some(raw) => parse_number("STAT_XPLORE_MAX_DEPTH", &raw)?,
            None => defaults.max_depth,
        };

        let bind_addr = lookup("STAT_XPLORE_BIND_ADDR").unwrap_or(defaults.bind_addr);

        Ok(Self {
            api_key,
            base_url,
            timeout,
            max_depth,
            bind_addr,
        })
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| StatXploreError::Config(format!("invalid base URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StatXploreError::Config(format!(
            "base URL must be http(s), got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| StatXploreError::Config(format!("{} must be a number, got '{}'", key, raw)))
}
