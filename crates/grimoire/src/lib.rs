//! Grimoire — resilient D&D 5e reference fetcher with tagged mock fallback.

pub mod config;
pub mod fetcher;
pub mod http_client;
pub mod mock;
pub mod types;

pub use config::{FetcherConfig, DEFAULT_TIMEOUT_MS, DEFAULT_UPSTREAMS};
pub use fetcher::ReferenceFetcher;
pub use http_client::{HttpClient, HttpResponse};
pub use types::*;
