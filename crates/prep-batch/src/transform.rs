//! The pluggable per-record `Transform` and the shared `CancelToken`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::BatchResult;

// ── Transform ─────────────────────────────────────────────────────────────────

/// The per-record domain operation a batch run applies.
///
/// One instance exists per worker thread, built by the factory passed to
/// [`run_batch`][crate::run_batch] — implementations may carry mutable
/// per-thread state (routers, solvers, RNGs) without any synchronization.
///
/// # Sub-results
///
/// [`apply`][Self::apply] may yield intermediate outputs (e.g. one person's
/// plan yields several solved location-assignment problems).  Each output
/// is handed back to [`accept`][Self::accept] to perform its write-back
/// side effect on the same record, after which the engine counts the record
/// as processed — exactly once, regardless of how many outputs it produced.
/// Transforms that mutate the record directly in `apply` return an empty
/// vec and skip implementing `accept`.
///
/// All side effects must stay confined to the record currently held;
/// records are exclusively owned by their worker while in a chunk.
pub trait Transform<R> {
    /// Intermediate output produced per record; `()` if there are none.
    type Output;

    /// Process one record, returning its sub-results.
    ///
    /// Errors are fatal to the whole batch run (fail-fast).
    fn apply(&mut self, record: &mut R) -> BatchResult<Vec<Self::Output>>;

    /// Apply one sub-result's side effect to its record.
    ///
    /// Called once per output of [`apply`][Self::apply], in order, before
    /// the record is counted as processed.  Default: no-op.
    fn accept(&mut self, record: &mut R, output: Self::Output) -> BatchResult<()> {
        let _ = (record, output);
        Ok(())
    }
}

/// Any `FnMut(&mut R) -> BatchResult<()>` closure is a transform without
/// sub-results.  Convenient for tests and simple one-off batch runs.
impl<R, F> Transform<R> for F
where
    F: FnMut(&mut R) -> BatchResult<()>,
{
    type Output = ();

    fn apply(&mut self, record: &mut R) -> BatchResult<Vec<()>> {
        self(record).map(|()| Vec::new())
    }
}

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared one-way abort flag for a batch run.
///
/// Set internally on the first transform failure, or externally (e.g. from
/// a signal handler) to cancel an otherwise unkillable run.  Workers
/// observe it at chunk boundaries; the monitor observes it each tick.
/// Once set it stays set.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.  Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
