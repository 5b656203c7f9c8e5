// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - config: timeouts, retry budget and concurrency for a run
// - http: probes one URL and classifies the answer
// - retry: gives each URL a few attempts before calling it dead
// =============================================================================

mod config;
mod http;
mod retry;

pub use config::{
    CheckerConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_RETRY_DELAY_MS, MAX_CONCURRENCY,
};
pub use http::{HttpProber, ProbeOutcome, Prober};
pub use retry::RetryPolicy;
