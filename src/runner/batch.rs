// src/runner/batch.rs
// =============================================================================
// One full pass over the link list.
//
// For every record we run the retrying probe against its URL and apply this
// table to its status:
//
//   before    outcome       after     reported as
//   active    unreachable   broken    Broken   (newly broken)
//   broken    reachable     active    Fixed    (newly fixed)
//   active    reachable     active    Active   (unchanged)
//   broken    unreachable   broken    Broken   (unchanged)
//
// Records are never added, removed or reordered; only `status` changes.
//
// By default links are checked one at a time. With a concurrency limit above
// one, up to that many probes run at once. `buffered` (unlike
// `buffer_unordered`) hands results back in input order, and each result is
// applied to the record at its own index, so the outcome of a run never
// depends on which server answered first.
// =============================================================================

use super::summary::{RunSummary, Transition};
use crate::checker::{CheckerConfig, ProbeOutcome, Prober, RetryPolicy, MAX_CONCURRENCY};
use crate::store::{LinkRecord, LinkStatus};
use futures::stream::{self, StreamExt};
use tracing::debug;

pub struct BatchRunner<P> {
    prober: P,
    policy: RetryPolicy,
    concurrency: usize,
}

impl<P: Prober> BatchRunner<P> {
    pub fn new(prober: P, policy: RetryPolicy, concurrency: usize) -> Self {
        Self {
            prober,
            policy,
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    pub fn from_config(prober: P, config: &CheckerConfig) -> Self {
        Self::new(prober, RetryPolicy::from_config(config), config.concurrency)
    }

    #[cfg(test)]
    pub(crate) fn prober(&self) -> &P {
        &self.prober
    }

    /// Checks every record, updating `status` in place.
    ///
    /// `on_progress` is called once per record, in list order, right after
    /// that record's status is settled.
    pub async fn run<F>(&self, records: &mut [LinkRecord], mut on_progress: F) -> RunSummary
    where
        F: FnMut(usize, &LinkRecord, Transition),
    {
        // Owned copies so the probes don't borrow `records` while we mutate it
        let urls: Vec<String> = records.iter().map(|r| r.url().to_string()).collect();

        let mut outcomes = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move {
                let outcome = self.policy.run(&self.prober, url).await;
                (index, outcome)
            })
            .buffered(self.concurrency);

        let mut summary = RunSummary::default();
        while let Some((index, outcome)) = outcomes.next().await {
            let record = &mut records[index];
            let before = record.status();
            let transition = apply_outcome(record, outcome);
            summary.record(before, record.status());

            debug!(index, url = %record.url(), ?outcome, ?transition, "record checked");
            on_progress(index, record, transition);
        }

        summary
    }
}

/// Applies one probe outcome to one record and reports what happened.
pub fn apply_outcome(record: &mut LinkRecord, outcome: ProbeOutcome) -> Transition {
    match (record.status(), outcome) {
        (LinkStatus::Active, ProbeOutcome::Unreachable) => {
            record.set_status(LinkStatus::Broken);
            Transition::Broken
        }
        (LinkStatus::Broken, ProbeOutcome::Reachable) => {
            record.set_status(LinkStatus::Active);
            Transition::Fixed
        }
        (LinkStatus::Active, ProbeOutcome::Reachable) => {
            record.normalize_status();
            Transition::Active
        }
        (LinkStatus::Broken, ProbeOutcome::Unreachable) => Transition::Broken,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `async move { ... }` inside `.map` do?
//    - It builds a future per URL; nothing runs until the stream polls it
//    - `buffered(n)` polls at most n of them at the same time
// -----------------------------------------------------------------------------
