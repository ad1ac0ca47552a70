//! Async HTTP client wrapping reqwest.
//!
//! One GET per call, no retries. Redirects are followed (up to 5) and every
//! request carries the JSON `Accept` header and the proxy's user agent.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::types::GrimoireResult;

/// Response from an upstream GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client used for upstream attempts.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose requests time out after `timeout_ms`.
    pub fn new(timeout_ms: u64, user_agent: &str) -> GrimoireResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform a single GET. The timeout covers the whole exchange, body included.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let resp = self.client.get(url).timeout(self.timeout).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(HttpResponse { status, body })
    }
}
