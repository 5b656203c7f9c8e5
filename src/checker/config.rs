// src/checker/config.rs
// =============================================================================
// Tuning knobs for a check run, with the defaults the dashboard has always
// used: 5 second probe timeout, 2 attempts per link, 500ms between attempts.
// =============================================================================

use anyhow::{bail, Result};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// One probe at a time: gentlest on the sites we check.
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Hard deadline for a single probe, measured from request start
    pub probe_timeout: Duration,
    /// Total attempts per link (not "extra" attempts)
    pub max_retries: u32,
    /// Pause between a failed attempt and the next one
    pub retry_delay: Duration,
    /// How many links are probed at the same time
    pub concurrency: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl CheckerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout.is_zero() {
            bail!("probe timeout must be greater than zero");
        }
        if self.max_retries == 0 {
            bail!("max retries must be at least 1");
        }
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            bail!(
                "concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY,
                self.concurrency
            );
        }
        Ok(())
    }
}
