//! Core data types for reference fetches.

use serde::Serialize;
use serde_json::Value;

/// Message attached to every mock payload.
pub const MOCK_MESSAGE: &str = "Using mock data - D&D API is currently unavailable";

/// A logical resource key such as `classes` or `spells/fireball`.
///
/// Surrounding whitespace and slashes are stripped on construction; a name
/// that is empty afterwards is missing. `.` and `..` segments are rejected so
/// the joined URL stays under the upstream's base path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointName(String);

impl EndpointName {
    /// Parse caller input into an endpoint name.
    pub fn parse(raw: &str) -> GrimoireResult<Self> {
        let trimmed = raw.trim().trim_matches('/').trim();
        if trimmed.is_empty() {
            return Err(GrimoireError::MissingEndpoint);
        }
        if trimmed.split(['/', '\\']).any(is_dot_segment) {
            return Err(GrimoireError::InvalidEndpoint(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse optional caller input; `None` is the missing-parameter case.
    pub fn from_optional(raw: Option<&str>) -> GrimoireResult<Self> {
        raw.map_or(Err(GrimoireError::MissingEndpoint), Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `.` or `..`, including the percent-encoded spellings URL parsers resolve.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    matches!(decoded.as_str(), "." | "..")
}

impl std::fmt::Display for EndpointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a single upstream attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptResult {
    /// 2xx with a JSON body. Always the last attempt of a live fetch.
    Success,
    /// The upstream answered with a non-success status.
    Status { code: u16 },
    /// No response within the per-attempt timeout.
    Timeout,
    /// Connection, TLS or protocol failure.
    Transport { message: String },
    /// 2xx but the body was not JSON.
    InvalidJson { message: String },
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success)
    }
}

impl std::fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptResult::Success => write!(f, "ok"),
            AttemptResult::Status { code } => write!(f, "status {code}"),
            AttemptResult::Timeout => write!(f, "timed out"),
            AttemptResult::Transport { message } => write!(f, "transport error: {message}"),
            AttemptResult::InvalidJson { message } => write!(f, "invalid JSON: {message}"),
        }
    }
}

/// One request against one upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub base_url: String,
    pub url: String,
    pub result: AttemptResult,
    pub elapsed_ms: u64,
}

/// Result of resolving an endpoint name.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// An upstream answered; `payload` is its body verbatim.
    Live {
        source: String,
        payload: Value,
        attempts: Vec<Attempt>,
    },
    /// Every upstream failed; `payload` is the annotated mock entry.
    Mock {
        payload: Value,
        attempts: Vec<Attempt>,
    },
}

impl FetchOutcome {
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            FetchOutcome::Live { attempts, .. } | FetchOutcome::Mock { attempts, .. } => attempts,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            FetchOutcome::Live { payload, .. } | FetchOutcome::Mock { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            FetchOutcome::Live { payload, .. } | FetchOutcome::Mock { payload, .. } => payload,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, FetchOutcome::Mock { .. })
    }

    /// Base URL that served the payload, or `"mock"`.
    pub fn source(&self) -> &str {
        match self {
            FetchOutcome::Live { source, .. } => source,
            FetchOutcome::Mock { .. } => "mock",
        }
    }
}

/// Errors that can occur in the reference fetcher.
#[derive(thiserror::Error, Debug)]
pub enum GrimoireError {
    #[error("Endpoint parameter is required")]
    MissingEndpoint,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid upstream '{url}': {reason}")]
    InvalidUpstream { url: String, reason: String },

    #[error("At least one upstream base URL is required")]
    NoUpstreams,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience result type.
pub type GrimoireResult<T> = Result<T, GrimoireError>;
