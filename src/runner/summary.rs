// src/runner/summary.rs
// =============================================================================
// Tallies for one check run.
//
// The runner threads a RunSummary through the pass and hands it back at the
// end, instead of bumping counters that live somewhere global.
// =============================================================================

use crate::store::{LinkRecord, LinkStatus};
use serde::Serialize;

/// What happened to one record during a run.
///
/// This is also the glyph printed on the record's progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Was active (or unknown), still active
    Active,
    /// Ends the run broken, whether it just broke or was already broken
    Broken,
    /// Was broken, answered this time
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub active_after: usize,
    pub broken_after: usize,
    pub newly_broken: usize,
    pub newly_fixed: usize,
    pub unchanged: usize,
}

impl RunSummary {
    /// Records one status change (or non-change).
    pub fn record(&mut self, before: LinkStatus, after: LinkStatus) {
        self.total += 1;
        match after {
            LinkStatus::Active => self.active_after += 1,
            LinkStatus::Broken => self.broken_after += 1,
        }
        match (before, after) {
            (LinkStatus::Active, LinkStatus::Broken) => self.newly_broken += 1,
            (LinkStatus::Broken, LinkStatus::Active) => self.newly_fixed += 1,
            _ => self.unchanged += 1,
        }
    }

    pub fn changes(&self) -> usize {
        self.newly_broken + self.newly_fixed
    }

    /// Counts what's in a list right now, without checking anything.
    pub fn snapshot(records: &[LinkRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.record(record.status(), record.status());
        }
        summary
    }
}

// `changes` is derived, but JSON consumers shouldn't have to add it up
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryDocument {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub changes: usize,
}

impl From<RunSummary> for SummaryDocument {
    fn from(summary: RunSummary) -> Self {
        Self {
            changes: summary.changes(),
            summary,
        }
    }
}
