//! Grimoire server — HTTP proxy and CLI over the resilient reference fetcher.

pub mod config;
pub mod error;
pub mod rest;

pub use config::{resolve_addr, resolve_fetcher_config};
pub use error::ApiError;
pub use rest::{router, serve, AppState};
