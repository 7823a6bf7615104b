//! `WorkCursor` — thread-safe chunked withdrawal from a record slice.

use std::sync::{Mutex, PoisonError};

/// A shared position marker over a fixed, ordered collection of records.
///
/// The cursor holds the not-yet-withdrawn tail of the input slice behind a
/// mutex.  [`withdraw`][Self::withdraw] splits off up to `max_size` records
/// from the front, so the chunks handed to workers are disjoint `&mut`
/// slices in original order — the partition guarantee falls out of
/// `split_at_mut` with no unsafe code.
///
/// The critical section contains nothing but the split and a pointer
/// update; workers queue on the mutex rather than race, and contention is
/// negligible at realistic chunk sizes.
pub struct WorkCursor<'a, T> {
    /// Remaining records.  Shrinks from the front; empty once exhausted.
    remaining: Mutex<&'a mut [T]>,
    /// Length of the original input, fixed at construction.
    total: usize,
}

impl<'a, T> WorkCursor<'a, T> {
    /// Create a cursor over `records`.  The cursor borrows the slice for its
    /// lifetime; the caller regains access once the batch run has joined.
    pub fn new(records: &'a mut [T]) -> Self {
        let total = records.len();
        Self { remaining: Mutex::new(records), total }
    }

    /// Length of the original input collection.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Atomically withdraw up to `max_size` records from the front of the
    /// remaining tail, in original order.
    ///
    /// An empty slice is the sole termination signal: once returned, every
    /// later call also returns empty.  `max_size == 0` is treated as
    /// exhaustion by callers and never requested by the engine (the config
    /// validates `chunk_size >= 1`).
    pub fn withdraw(&self, max_size: usize) -> &'a mut [T] {
        // A worker can only panic outside this critical section (the body
        // is split + store), so a poisoned lock still guards a consistent
        // tail and is safe to recover.
        let mut tail = self
            .remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let rest = std::mem::take(&mut *tail);
        let n = max_size.min(rest.len());
        let (chunk, rest) = rest.split_at_mut(n);
        *tail = rest;
        chunk
    }
}
