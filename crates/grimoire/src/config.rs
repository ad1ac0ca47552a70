//! Fetcher configuration: upstream list, timeout, user agent.

use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};
use url::Url;

use crate::types::{GrimoireError, GrimoireResult};

/// Upstreams tried in order when nothing overrides them.
pub const DEFAULT_UPSTREAMS: &[&str] = &[
    "https://www.dnd5eapi.co/api",
    "https://dnd5eapi.co/api",
    "https://api.open5e.com",
];

/// Per-attempt timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

pub const ENV_UPSTREAMS: &str = "GRIMOIRE_UPSTREAMS";
pub const ENV_TIMEOUT_MS: &str = "GRIMOIRE_TIMEOUT_MS";

/// User agent sent with every upstream request.
pub fn default_user_agent() -> String {
    format!(
        "grimoire/{} (+D&D 5e reference proxy)",
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub upstreams: Vec<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            upstreams: DEFAULT_UPSTREAMS.iter().map(|s| s.to_string()).collect(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }
}

impl FetcherConfig {
    /// Defaults overlaid with `GRIMOIRE_UPSTREAMS` and `GRIMOIRE_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FetcherConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(ENV_UPSTREAMS) {
            Some(raw) => {
                let upstreams = split_list(&raw);
                if upstreams.is_empty() {
                    warn!("{ENV_UPSTREAMS} is set but empty, using defaults");
                } else {
                    config.upstreams = upstreams;
                }
            }
            None => info!("{ENV_UPSTREAMS} not set, using built-in upstreams"),
        }

        config.timeout_ms = parse_or(lookup(ENV_TIMEOUT_MS), ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS);
        config
    }

    /// Replace the upstream list when `upstreams` is non-empty.
    pub fn with_upstreams(mut self, upstreams: Vec<String>) -> Self {
        if !upstreams.is_empty() {
            self.upstreams = upstreams;
        }
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        if let Some(ms) = timeout_ms {
            self.timeout_ms = ms;
        }
        self
    }

    /// Check every upstream and normalise it to a base without a trailing `/`.
    pub fn validate(&self) -> GrimoireResult<Vec<String>> {
        if self.upstreams.is_empty() {
            return Err(GrimoireError::NoUpstreams);
        }
        self.upstreams.iter().map(|u| normalize_base(u)).collect()
    }
}

/// Parse one base URL, require http(s), drop trailing slashes.
pub fn normalize_base(raw: &str) -> GrimoireResult<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| GrimoireError::InvalidUpstream {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GrimoireError::InvalidUpstream {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(GrimoireError::InvalidUpstream {
            url: trimmed.to_string(),
            reason: "base URL must not carry a query or fragment".to_string(),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = value else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}
