//! Fallback-chain integration tests against wiremock upstreams.

use std::time::Duration;

use assert_json_diff::assert_json_eq;
use serde_json::{json, Value};
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grimoire::{AttemptResult, FetchOutcome, FetcherConfig, GrimoireError, ReferenceFetcher};
use grimoire::types::MOCK_MESSAGE;

// ── helpers ──

/// Nothing listens on port 1, so connections are refused immediately.
const DEAD_UPSTREAM: &str = "http://127.0.0.1:1/api";

fn fetcher_for(upstreams: Vec<String>, timeout_ms: u64) -> ReferenceFetcher {
    let config = FetcherConfig::default()
        .with_upstreams(upstreams)
        .with_timeout_ms(Some(timeout_ms));
    ReferenceFetcher::new(&config).expect("valid config")
}

fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

fn spells_page() -> Value {
    json!({
        "count": 2,
        "results": [
            { "index": "fireball", "name": "Fireball", "url": "/api/spells/fireball" },
            { "index": "shield", "name": "Shield", "url": "/api/spells/shield" }
        ]
    })
}

async fn failing_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

// ── missing endpoint ──

#[tokio::test]
async fn missing_endpoint_contacts_no_upstream() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(vec![api_base(&server)], 2_000);
    for input in [None, Some(""), Some("   "), Some("/")] {
        let result = fetcher.fetch(input).await;
        assert!(
            matches!(result, Err(GrimoireError::MissingEndpoint)),
            "input {input:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn dot_segments_never_leave_the_base_path() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret": true})))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(vec![api_base(&server)], 2_000);
    for input in ["../secret", "spells/../../secret", "%2E%2E/secret"] {
        let result = fetcher.fetch(Some(input)).await;
        assert!(
            matches!(result, Err(GrimoireError::InvalidEndpoint(_))),
            "input {input:?} should be rejected"
        );
    }
}

// ── first success wins ──

#[tokio::test]
async fn first_upstream_success_is_returned_verbatim() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/spells"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wrong": true})))
        .expect(0)
        .mount(&second)
        .await;

    let fetcher = fetcher_for(vec![api_base(&first), api_base(&second)], 2_000);
    let outcome = fetcher.fetch(Some("spells")).await.unwrap();

    assert!(!outcome.is_mock());
    assert_eq!(outcome.source(), api_base(&first));
    assert_eq!(outcome.attempts().len(), 1);
    assert_json_eq!(outcome.into_payload(), spells_page());
}

#[tokio::test]
async fn requests_carry_user_agent() {
    let server = MockServer::start().await;
    Mock::given(path("/api/classes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(vec![api_base(&server)], 2_000);
    fetcher.fetch(Some("classes")).await.unwrap();

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let ua = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(ua.starts_with("grimoire/"), "unexpected user agent {ua}");
}

// ── fall through ──

#[tokio::test]
async fn error_status_falls_through_to_second_upstream() {
    let first = failing_server(500).await;
    let second = MockServer::start().await;
    Mock::given(path("/api/spells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .expect(1)
        .mount(&second)
        .await;

    let fetcher = fetcher_for(vec![api_base(&first), api_base(&second)], 2_000);
    let outcome = fetcher.fetch(Some("spells")).await.unwrap();

    let attempts = outcome.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].result, AttemptResult::Status { code: 500 });
    assert_eq!(attempts[0].url, format!("{}/spells", api_base(&first)));
    assert!(attempts[1].result.is_success());
    assert_eq!(outcome.source(), api_base(&second));
    assert_json_eq!(outcome.into_payload(), spells_page());
}

#[tokio::test]
async fn connection_refused_falls_through_to_second_upstream() {
    let second = MockServer::start().await;
    Mock::given(path("/api/spells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .mount(&second)
        .await;

    let fetcher = fetcher_for(vec![DEAD_UPSTREAM.to_string(), api_base(&second)], 2_000);
    let outcome = fetcher.fetch(Some("spells")).await.unwrap();

    let attempts = outcome.attempts();
    assert_eq!(attempts.len(), 2);
    assert!(matches!(attempts[0].result, AttemptResult::Transport { .. }));
    assert!(!outcome.is_mock());
}

#[tokio::test]
async fn invalid_json_counts_as_failure() {
    let first = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&first)
        .await;
    let second = MockServer::start().await;
    Mock::given(path("/api/spells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .mount(&second)
        .await;

    let fetcher = fetcher_for(vec![api_base(&first), api_base(&second)], 2_000);
    let outcome = fetcher.fetch(Some("spells")).await.unwrap();

    assert!(matches!(
        outcome.attempts()[0].result,
        AttemptResult::InvalidJson { .. }
    ));
    assert_json_eq!(outcome.into_payload(), spells_page());
}

#[tokio::test]
async fn slow_upstream_times_out_and_next_is_tried() {
    let slow = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"late": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&slow)
        .await;
    let fast = MockServer::start().await;
    Mock::given(path("/api/spells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .mount(&fast)
        .await;

    let fetcher = fetcher_for(vec![api_base(&slow), api_base(&fast)], 250);
    let started = std::time::Instant::now();
    let outcome = fetcher.fetch(Some("spells")).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(outcome.attempts()[0].result, AttemptResult::Timeout);
    assert_json_eq!(outcome.into_payload(), spells_page());
}

// ── exhaustion ──

#[tokio::test]
async fn all_upstreams_503_serves_mock_classes() {
    let first = failing_server(503).await;
    let second = failing_server(503).await;

    let fetcher = fetcher_for(vec![api_base(&first), api_base(&second)], 2_000);
    let outcome = fetcher.fetch(Some("classes")).await.unwrap();

    assert!(outcome.is_mock());
    assert_eq!(outcome.source(), "mock");
    assert_eq!(outcome.attempts().len(), 2);

    let payload = outcome.into_payload();
    assert_eq!(payload["count"], 12);
    assert_eq!(payload["results"].as_array().map(Vec::len), Some(12));
    assert_eq!(payload["_mock"], true);
    assert_eq!(
        payload["_message"],
        "Using mock data - D&D API is currently unavailable"
    );
}

#[tokio::test]
async fn unknown_endpoint_mock_is_empty_shape() {
    let fetcher = fetcher_for(vec![DEAD_UPSTREAM.to_string()], 2_000);
    let outcome = fetcher.fetch(Some("homebrew/owlbear-knight")).await.unwrap();

    assert_json_eq!(
        outcome.into_payload(),
        json!({
            "count": 0,
            "results": [],
            "_mock": true,
            "_message": MOCK_MESSAGE,
        })
    );
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let first = failing_server(502).await;
    let second = MockServer::start().await;
    Mock::given(path("/api/spells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spells_page()))
        .expect(3)
        .mount(&second)
        .await;

    let fetcher = fetcher_for(vec![api_base(&first), api_base(&second)], 2_000);
    let mut payloads = Vec::new();
    for _ in 0..3 {
        let outcome = fetcher.fetch(Some("spells")).await.unwrap();
        assert_eq!(outcome.attempts().len(), 2);
        payloads.push(outcome.into_payload());
    }
    assert!(payloads.windows(2).all(|w| w[0] == w[1]));

    let mocked = fetcher_for(vec![DEAD_UPSTREAM.to_string()], 2_000);
    let a = mocked.fetch(Some("races")).await.unwrap();
    let b = mocked.fetch(Some("races")).await.unwrap();
    assert!(matches!(
        (&a, &b),
        (FetchOutcome::Mock { .. }, FetchOutcome::Mock { .. })
    ));
    assert_eq!(a.payload(), b.payload());
}
