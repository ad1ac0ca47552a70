//! Configuration loading and resolution.

use grimoire::FetcherConfig;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const ENV_ADDR: &str = "GRIMOIRE_ADDR";

/// Resolve the listen address: explicit flag, then `GRIMOIRE_ADDR`, then the default.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var(ENV_ADDR) {
        if !env_addr.trim().is_empty() {
            return env_addr.trim().to_string();
        }
    }

    DEFAULT_ADDR.to_string()
}

/// Environment-derived fetcher config with CLI overrides applied on top.
pub fn resolve_fetcher_config(upstreams: Vec<String>, timeout_ms: Option<u64>) -> FetcherConfig {
    FetcherConfig::from_env()
        .with_upstreams(upstreams)
        .with_timeout_ms(timeout_ms)
}
