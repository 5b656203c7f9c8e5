// src/checker/retry.rs
// =============================================================================
// Fixed-budget retries around a Prober.
//
// A single slow response shouldn't mark a bookmark broken, so each link gets
// a few attempts with a short pause in between. No exponential backoff: the
// usual failure is one overloaded server, not the whole network.
//
// Worst case per link: attempts * timeout + (attempts - 1) * delay
// =============================================================================

use super::config::CheckerConfig;
use super::http::{ProbeOutcome, Prober};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CheckerConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            delay: config.retry_delay,
        }
    }

    /// Probes `url` until it answers reachable or the attempts run out.
    pub async fn run<P>(&self, prober: &P, url: &str) -> ProbeOutcome
    where
        P: Prober + ?Sized,
    {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            if prober.probe(url).await.is_reachable() {
                return ProbeOutcome::Reachable;
            }
            if attempt < attempts {
                debug!(url, attempt, "probe failed, retrying");
                tokio::time::sleep(self.delay).await;
            }
        }

        ProbeOutcome::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    // Replays a fixed script of outcomes; repeats the last one when it runs out
    struct ScriptedProber {
        script: Vec<ProbeOutcome>,
        calls: AtomicUsize,
        call_times: Mutex<Vec<Instant>>,
    }

    impl ScriptedProber {
        fn new(script: Vec<ProbeOutcome>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                call_times: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, _url: &str) -> ProbeOutcome {
            self.call_times.lock().unwrap().push(Instant::now());
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let idx = n.min(self.script.len() - 1);
            self.script[idx]
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_then_succeed() {
        let prober = ScriptedProber::new(vec![ProbeOutcome::Unreachable, ProbeOutcome::Reachable]);
        let policy = RetryPolicy::default();

        let started = Instant::now();
        let outcome = policy.run(&prober, "https://flaky.example").await;

        assert_eq!(outcome, ProbeOutcome::Reachable);
        assert_eq!(prober.calls(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(500));

        let times = prober.call_times.lock().unwrap();
        assert_eq!(times[1] - times[0], Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_exactly_two_attempts() {
        let prober = ScriptedProber::new(vec![ProbeOutcome::Unreachable]);
        let policy = RetryPolicy::default();

        let started = Instant::now();
        let outcome = policy.run(&prober, "https://dead.example").await;

        assert_eq!(outcome, ProbeOutcome::Unreachable);
        assert_eq!(prober.calls(), 2);
        // One pause between the two attempts, none after the last
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let prober = ScriptedProber::new(vec![ProbeOutcome::Reachable]);
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_millis(500),
        };

        let started = Instant::now();
        assert_eq!(policy.run(&prober, "https://ok.example").await, ProbeOutcome::Reachable);
        assert_eq!(prober.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_budget_is_respected() {
        let prober = ScriptedProber::new(vec![ProbeOutcome::Unreachable]);
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::from_millis(100),
        };

        let started = Instant::now();
        assert_eq!(policy.run(&prober, "https://dead.example").await, ProbeOutcome::Unreachable);
        assert_eq!(prober.calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_probes_once() {
        let prober = ScriptedProber::new(vec![ProbeOutcome::Reachable]);
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_millis(500),
        };
        assert_eq!(policy.run(&prober, "https://ok.example").await, ProbeOutcome::Reachable);
        assert_eq!(prober.calls(), 1);
    }
}
