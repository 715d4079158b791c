// src/checker/http.rs
// =============================================================================
// This module decides whether a single URL is alive.
//
// Key functionality:
// - Makes an HTTP HEAD request first (lightweight, no body download)
// - Falls back to GET only if HEAD fails at the transport level
//   (timeout, DNS, refused connection, TLS, broken response...)
// - Classifies the final state into Healthy / Broken with a status text
//
// The network sits behind the LinkTransport trait so the probing logic can be
// tested with doubles, while ReqwestTransport does the real work.
//
// Rust concepts:
// - Result<T, E>: each stage returns Result<StatusCode, ProbeFault> instead of
//   throwing, and a pure function maps the stages to an outcome
// - Traits + async_trait: a swappable async transport
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use super::normalize::{normalize, NormalizePolicy};
use super::report::{ProbeOutcome, BROWSER_EXCEPTION_ERROR, LINK_ERROR};
use crate::config::CheckerConfig;

/// Transport-level failure of one request. Never leaves the prober.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFault {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("too many redirects: {0}")]
    Redirect(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

// Categorizes reqwest errors the same way for both stages
impl From<reqwest::Error> for ProbeFault {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();

        if error.is_timeout() {
            ProbeFault::Timeout(message)
        } else if error.is_redirect() {
            ProbeFault::Redirect(message)
        } else if error.is_connect() {
            ProbeFault::Connect(message)
        } else if error.is_builder() {
            ProbeFault::InvalidUrl(message)
        } else {
            ProbeFault::Other(message)
        }
    }
}

/// The two requests a probe can make.
#[async_trait]
pub trait LinkTransport: Send + Sync {
    /// Header-only request; the lightweight probe.
    async fn head(&self, url: &str) -> Result<StatusCode, ProbeFault>;

    /// Full request; the fallback probe.
    async fn get(&self, url: &str) -> Result<StatusCode, ProbeFault>;
}

/// reqwest-backed transport. One instance (one connection pool) per batch.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    // Redirects are followed, the timeout covers the whole request, and idle
    // connections per host are capped at the admission limit.
    pub fn new(config: &CheckerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(config.concurrency)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkTransport for ReqwestTransport {
    async fn head(&self, url: &str) -> Result<StatusCode, ProbeFault> {
        let response = self.client.head(url).send().await?;
        Ok(response.status())
    }

    // Only the status line matters; the body is dropped unread
    async fn get(&self, url: &str) -> Result<StatusCode, ProbeFault> {
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }
}

/// How far a probe got before it had an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStages {
    /// HEAD produced a status; no fallback was needed
    Lightweight(StatusCode),
    /// HEAD failed at the transport level, GET was attempted
    Fallback {
        lightweight: ProbeFault,
        full: Result<StatusCode, ProbeFault>,
    },
}

// Maps the terminal state of a probe to an outcome
//
// | stage reached       | result      | outcome                          |
// |---------------------|-------------|----------------------------------|
// | HEAD                | status<400  | Healthy                          |
// | HEAD                | status>=400 | Broken("Link Error")             |
// | GET (HEAD faulted)  | status<400  | Healthy                          |
// | GET (HEAD faulted)  | status>=400 | Broken("Link Error")             |
// | GET (HEAD faulted)  | fault       | Broken("Browser exception Error")|
pub fn classify(stages: &ProbeStages) -> ProbeOutcome {
    match stages {
        ProbeStages::Lightweight(status) => status_outcome(*status),
        ProbeStages::Fallback { full: Ok(status), .. } => status_outcome(*status),
        ProbeStages::Fallback { full: Err(_), .. } => ProbeOutcome::broken(BROWSER_EXCEPTION_ERROR),
    }
}

fn status_outcome(status: StatusCode) -> ProbeOutcome {
    if status.as_u16() >= 400 {
        ProbeOutcome::broken(LINK_ERROR)
    } else {
        ProbeOutcome::Healthy
    }
}

/// Runs the HEAD-then-GET sequence for one URL.
#[derive(Debug)]
pub struct LinkProber<T> {
    transport: T,
    policy: NormalizePolicy,
}

impl<T: LinkTransport> LinkProber<T> {
    pub fn new(transport: T, policy: NormalizePolicy) -> Self {
        Self { transport, policy }
    }

    // Normalizes, probes and classifies. Total: every failure becomes Broken.
    //
    // The caller is expected to hold an admission slot for the duration.
    pub async fn probe(&self, raw_url: &str) -> ProbeOutcome {
        let stages = self.run_stages(raw_url).await;
        classify(&stages)
    }

    async fn run_stages(&self, raw_url: &str) -> ProbeStages {
        let url = normalize(raw_url, self.policy);

        let lightweight = match self.transport.head(&url).await {
            Ok(status) => return ProbeStages::Lightweight(status),
            Err(fault) => fault,
        };
        debug!(url = %raw_url, normalized = %url, error = %lightweight, "HEAD failed, falling back to GET");

        let full = self.transport.get(&url).await;
        if let Err(fault) = &full {
            warn!(url = %raw_url, normalized = %url, error = %fault, "GET fallback failed");
        }

        ProbeStages::Fallback { lightweight, full }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why HEAD first?
//    - Most working links answer HEAD, and HEAD never downloads a body
//    - A 4xx/5xx on HEAD is taken at face value (no second request)
//
// 2. Why GET only on transport failure?
//    - Some servers drop or hang on HEAD but serve GET fine
//    - Retrying those avoids reporting working product pages as broken
//
// 3. Why is classify() separate?
//    - It is a pure function over the stages, so the status table above is
//      tested without any network at all
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fault() -> ProbeFault {
        ProbeFault::Connect("connection refused".to_string())
    }

    #[test]
    fn test_classify_lightweight_statuses() {
        assert_eq!(classify(&ProbeStages::Lightweight(StatusCode::OK)), ProbeOutcome::Healthy);
        assert_eq!(
            classify(&ProbeStages::Lightweight(StatusCode::MOVED_PERMANENTLY)),
            ProbeOutcome::Healthy
        );
        assert_eq!(
            classify(&ProbeStages::Lightweight(StatusCode::BAD_REQUEST)),
            ProbeOutcome::broken(LINK_ERROR)
        );
        assert_eq!(
            classify(&ProbeStages::Lightweight(StatusCode::SERVICE_UNAVAILABLE)),
            ProbeOutcome::broken(LINK_ERROR)
        );
    }

    #[test]
    fn test_classify_fallback_statuses() {
        let recovered = ProbeStages::Fallback {
            lightweight: fault(),
            full: Ok(StatusCode::OK),
        };
        assert_eq!(classify(&recovered), ProbeOutcome::Healthy);

        let not_found = ProbeStages::Fallback {
            lightweight: fault(),
            full: Ok(StatusCode::NOT_FOUND),
        };
        assert_eq!(classify(&not_found), ProbeOutcome::broken(LINK_ERROR));

        let both_failed = ProbeStages::Fallback {
            lightweight: fault(),
            full: Err(ProbeFault::Timeout("deadline".to_string())),
        };
        assert_eq!(classify(&both_failed), ProbeOutcome::broken(BROWSER_EXCEPTION_ERROR));
    }

    fn prober(timeout: Duration) -> LinkProber<ReqwestTransport> {
        let config = CheckerConfig::default().with_timeout(timeout);
        let transport = ReqwestTransport::new(&config).unwrap();
        LinkProber::new(transport, config.normalize)
    }

    #[tokio::test]
    async fn test_head_success_skips_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_secs(5))
            .probe(&format!("{}/ok", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::Healthy);
    }

    #[tokio::test]
    async fn test_head_error_status_is_broken_without_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_secs(5))
            .probe(&format!("{}/gone", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(LINK_ERROR));
    }

    #[tokio::test]
    async fn test_scheme_less_url_is_normalized_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/404"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let bare = server.uri().trim_start_matches("http://").to_string();
        let outcome = prober(Duration::from_secs(5))
            .probe(&format!("{}/404", bare))
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(LINK_ERROR));
    }

    #[tokio::test]
    async fn test_head_timeout_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow-head"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow-head"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_millis(300))
            .probe(&format!("{}/slow-head", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::Healthy);
    }

    #[tokio::test]
    async fn test_fallback_error_status_is_link_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_millis(300))
            .probe(&format!("{}/flaky", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(LINK_ERROR));
    }

    #[tokio::test]
    async fn test_both_stages_timing_out_is_browser_exception() {
        let server = MockServer::start().await;
        Mock::given(path("/hang"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_millis(300))
            .probe(&format!("{}/hang", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(BROWSER_EXCEPTION_ERROR));
    }

    #[tokio::test]
    async fn test_refused_connection_is_browser_exception() {
        // Port 1 is privileged and has no listener in test environments
        let outcome = prober(Duration::from_secs(2))
            .probe("http://127.0.0.1:1/")
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(BROWSER_EXCEPTION_ERROR));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_browser_exception() {
        let outcome = prober(Duration::from_secs(2)).probe("not a url").await;
        assert_eq!(outcome, ProbeOutcome::broken(BROWSER_EXCEPTION_ERROR));
    }

    #[tokio::test]
    async fn test_redirects_are_followed_to_final_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_secs(5))
            .probe(&format!("{}/old", server.uri()))
            .await;
        assert_eq!(outcome, ProbeOutcome::broken(LINK_ERROR));
    }

    #[tokio::test]
    async fn test_browser_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(header_regex("user-agent", "^Mozilla/5.0 .*Chrome/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = prober(Duration::from_secs(5)).probe(&server.uri()).await;
        assert_eq!(outcome, ProbeOutcome::Healthy);
    }

    #[test]
    fn test_transport_builds_from_default_config() {
        assert!(ReqwestTransport::new(&CheckerConfig::default()).is_ok());
    }
}
