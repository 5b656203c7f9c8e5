// src/checker/http.rs
// =============================================================================
// This module decides whether a single URL is alive.
//
// Key functionality:
// - Rejects malformed / non-http(s) URLs without touching the network
// - Makes one HTTP HEAD request (lightweight, no body download)
// - Follows server redirects and looks at the final status code
// - Gives up after a hard deadline and abandons the request
//
// The status code policy is deliberately forgiving. Only codes that say
// "this page is gone" (404, 410) or "this server is failing" (5xx) count
// as broken. Auth walls (401/403), rate limiting (429) and redirects all
// count as reachable: a bookmark behind a login page is still a good
// bookmark.
//
// Rust concepts:
// - Traits + async-trait: Prober lets tests swap in a fake network
// - tokio::time::timeout: wraps any future with a deadline
// - Never-fail APIs: every error is folded into an outcome value
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Result of one reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

/// Why a probe failed. These never leave this module: they're logged and
/// turned into `ProbeOutcome::Unreachable`.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("not an http(s) URL: {0:?}")]
    MalformedUrl(String),
}

/// Anything that can tell us whether a URL is alive.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Must not panic and must not hang past its own deadline.
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Maps a final HTTP status code to an outcome.
///
/// 404, 410 and every 5xx are unreachable. Everything else is reachable.
pub fn classify_status(status: StatusCode) -> ProbeOutcome {
    if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) || status.is_server_error() {
        ProbeOutcome::Unreachable
    } else {
        ProbeOutcome::Reachable
    }
}

/// Parses `url` and checks it is something we know how to probe.
pub fn parse_http_url(url: &str) -> Result<Url, ProbeError> {
    let parsed = Url::parse(url).map_err(|_| ProbeError::MalformedUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ProbeError::MalformedUrl(url.to_string())),
    }
}

/// The real prober: HEAD requests over reqwest.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Builds a prober with its own HTTP client.
    ///
    /// The client is reused for every probe (connection pooling), so build
    /// one of these per run, not per link.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .user_agent(concat!("link-warden/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn try_probe(&self, url: &str) -> Result<StatusCode, ProbeError> {
        let target = parse_http_url(url)?;

        // Dropping the send() future on timeout cancels the request
        let request = self.client.head(target).send();
        match tokio::time::timeout(self.timeout, request).await {
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
            Ok(Err(e)) if e.is_timeout() => Err(ProbeError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(ProbeError::Network(e)),
            Ok(Ok(response)) => Ok(response.status()),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.try_probe(url).await {
            Ok(status) => {
                let outcome = classify_status(status);
                debug!(url, status = status.as_u16(), ?outcome, "probe answered");
                outcome
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                ProbeOutcome::Unreachable
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for something with one real implementation?
//    - The batch runner only needs "give me an outcome for this URL"
//    - Tests can plug in a fake that answers instantly and predictably
//
// 2. Why tokio::time::timeout instead of just the client timeout?
//    - It's a hard limit measured from the moment we start the request
//    - When it fires, the request future is dropped, which cancels it
// -----------------------------------------------------------------------------
