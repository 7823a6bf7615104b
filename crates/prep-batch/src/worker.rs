//! The per-thread worker loop.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cursor::WorkCursor;
use crate::transform::{CancelToken, Transform};
use crate::{BatchError, BatchResult};

/// Run one worker to cursor exhaustion (or abort).
///
/// Loop: withdraw a chunk; an empty chunk is the only normal exit.  Every
/// record is applied in chunk order; each sub-result is accepted before the
/// shared counter is incremented — exactly once per record.
///
/// On a transform error the worker trips `abort` so siblings stop at their
/// next chunk boundary and the monitor can exit, then returns the error.
/// A worker that merely *observes* the flag returns
/// [`BatchError::Cancelled`]; the engine reports the originating error in
/// preference to these.
pub(crate) fn run_worker<R, T>(
    cursor: &WorkCursor<'_, R>,
    mut transform: T,
    processed: &AtomicU64,
    abort: &CancelToken,
    chunk_size: usize,
) -> BatchResult<()>
where
    T: Transform<R>,
{
    loop {
        if abort.is_cancelled() {
            return Err(BatchError::Cancelled);
        }

        let chunk = cursor.withdraw(chunk_size);
        if chunk.is_empty() {
            return Ok(());
        }

        for record in chunk {
            let outputs = match transform.apply(record) {
                Ok(outputs) => outputs,
                Err(e) => {
                    abort.cancel();
                    return Err(e);
                }
            };

            for output in outputs {
                if let Err(e) = transform.accept(record, output) {
                    abort.cancel();
                    return Err(e);
                }
            }

            // Relaxed suffices: the counter is monotonic progress data; the
            // exact final value is published to the engine by thread join.
            processed.fetch_add(1, Ordering::Relaxed);
        }
    }
}
