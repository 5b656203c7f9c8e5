// src/runner/mod.rs
// =============================================================================
// A complete check run: load the list, check every link, save the list.
//
// The store is read exactly once before any network activity and written
// exactly once after every link has been checked. If the read fails, nothing
// is probed and nothing is written. If the write fails, the results of the
// run are lost; the previous file stays as it was.
// =============================================================================

mod batch;
mod summary;

pub use batch::BatchRunner;
pub use summary::{RunSummary, Transition};
pub(crate) use summary::SummaryDocument;

use crate::checker::Prober;
use crate::store::{LinkRecord, LinkStore, StoreError};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("could not read link list")]
    StoreRead(#[source] StoreError),

    #[error("could not save link list, results of this run were discarded")]
    StoreWrite(#[source] StoreError),
}

/// Runs one full check against `store`.
///
/// Returns the final records (in their original order) along with the
/// summary, so callers can report on them after the write.
pub async fn check_links<S, P, F>(
    store: &S,
    runner: &BatchRunner<P>,
    on_progress: F,
) -> Result<(Vec<LinkRecord>, RunSummary), CheckError>
where
    S: LinkStore + ?Sized,
    P: Prober,
    F: FnMut(usize, &LinkRecord, Transition),
{
    let mut records = store.load().await.map_err(CheckError::StoreRead)?;
    info!(count = records.len(), "checking links");

    let summary = runner.run(&mut records, on_progress).await;

    if let Err(e) = store.save(&records).await {
        warn!(error = %e, "save failed after check");
        return Err(CheckError::StoreWrite(e));
    }

    info!(
        total = summary.total,
        broken = summary.broken_after,
        changes = summary.changes(),
        "check complete"
    );
    Ok((records, summary))
}
