//! Resilient reference fetcher.
//!
//! Walks the upstream list in order with one bounded attempt per upstream.
//! The first 2xx response with a JSON body wins. When every upstream has
//! failed, the static mock payload for the endpoint is returned instead, so
//! callers always get a JSON object back.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::FetcherConfig;
use crate::http_client::HttpClient;
use crate::mock;
use crate::types::{Attempt, AttemptResult, EndpointName, FetchOutcome, GrimoireResult};

/// Resolves endpoint names against an ordered list of upstreams.
///
/// Cheap to clone; holds no mutable state.
#[derive(Clone)]
pub struct ReferenceFetcher {
    client: HttpClient,
    upstreams: Arc<[String]>,
}

impl ReferenceFetcher {
    /// Build a fetcher from a validated configuration.
    pub fn new(config: &FetcherConfig) -> GrimoireResult<Self> {
        let upstreams = config.validate()?;
        let client = HttpClient::new(config.timeout_ms, &config.user_agent)?;
        Ok(Self {
            client,
            upstreams: upstreams.into(),
        })
    }

    /// Upstream base URLs in the order they are tried.
    pub fn upstreams(&self) -> &[String] {
        &self.upstreams
    }

    pub fn timeout_ms(&self) -> u64 {
        self.client.timeout().as_millis() as u64
    }

    /// Resolve `endpoint` to JSON.
    ///
    /// Returns an error only when the endpoint name is missing, blank, or
    /// climbs out of the base path with `.`/`..`. No upstream is contacted then.
    pub async fn fetch(&self, endpoint: Option<&str>) -> GrimoireResult<FetchOutcome> {
        let endpoint = EndpointName::from_optional(endpoint)?;
        Ok(self.fetch_endpoint(&endpoint).await)
    }

    /// Resolve an already-validated endpoint name. Never fails.
    pub async fn fetch_endpoint(&self, endpoint: &EndpointName) -> FetchOutcome {
        let mut attempts = Vec::with_capacity(self.upstreams.len());

        for base in self.upstreams.iter() {
            let url = join_url(base, endpoint);
            debug!(%endpoint, base_url = %base, "trying upstream");

            let started = Instant::now();
            let result = self.attempt(&url).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(payload) => {
                    info!(%endpoint, base_url = %base, elapsed_ms, "upstream answered");
                    attempts.push(Attempt {
                        base_url: base.clone(),
                        url,
                        result: AttemptResult::Success,
                        elapsed_ms,
                    });
                    return FetchOutcome::Live {
                        source: base.clone(),
                        payload,
                        attempts,
                    };
                }
                Err(failure) => {
                    warn!(%endpoint, base_url = %base, elapsed_ms, outcome = %failure, "upstream failed");
                    attempts.push(Attempt {
                        base_url: base.clone(),
                        url,
                        result: failure,
                        elapsed_ms,
                    });
                }
            }
        }

        warn!(
            %endpoint,
            attempts = attempts.len(),
            "all upstreams failed, serving mock data"
        );
        FetchOutcome::Mock {
            payload: mock::mock_response(endpoint.as_str()),
            attempts,
        }
    }

    async fn attempt(&self, url: &str) -> Result<Value, AttemptResult> {
        let resp = self.client.get(url).await.map_err(classify)?;

        if !resp.is_success() {
            return Err(AttemptResult::Status { code: resp.status });
        }

        serde_json::from_str(&resp.body).map_err(|e| AttemptResult::InvalidJson {
            message: e.to_string(),
        })
    }
}

/// `{base}/{endpoint}` with exactly one slash between them.
pub fn join_url(base: &str, endpoint: &EndpointName) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint.as_str())
}

fn classify(err: reqwest::Error) -> AttemptResult {
    if err.is_timeout() {
        AttemptResult::Timeout
    } else {
        AttemptResult::Transport {
            message: err.to_string(),
        }
    }
}
