//! `run_batch` — composes cursor, workers, and monitor into one blocking call.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::cursor::WorkCursor;
use crate::monitor::ProgressMonitor;
use crate::transform::{CancelToken, Transform};
use crate::worker::run_worker;
use crate::{BatchError, BatchResult};

/// Default maximum records withdrawn per cursor call.
///
/// Large enough that cursor lock traffic is noise even with dozens of
/// workers, small enough that progress stays visibly fresh.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

// ── BatchConfig ───────────────────────────────────────────────────────────────

/// Configuration for one batch run.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Label prefixed to every status line (e.g. `"Routing"`).
    pub label: String,

    /// Number of parallel worker threads.  Must be ≥ 1.
    pub threads: usize,

    /// Maximum records withdrawn per cursor call.  Must be ≥ 1.
    /// Default: [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: usize,

    /// Monitor sampling interval.  Default: 1 s.
    pub report_interval: Duration,
}

impl BatchConfig {
    pub fn new(label: impl Into<String>, threads: usize) -> Self {
        Self {
            label: label.into(),
            threads,
            chunk_size: DEFAULT_CHUNK_SIZE,
            report_interval: Duration::from_secs(1),
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Reject non-positive parameters before any thread starts.
    fn validate(&self) -> BatchResult<()> {
        if self.threads == 0 {
            return Err(BatchError::Config("threads must be >= 1".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(BatchError::Config("chunk_size must be >= 1".to_string()));
        }
        Ok(())
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Run `factory`-built transforms over every record in `records`, blocking
/// until all workers and the monitor have terminated.
///
/// Status lines go to stdout; use [`run_batch_with`] to supply a different
/// sink or an external [`CancelToken`].  The engine itself persists
/// nothing — on `Ok(())` every record has been transformed exactly once and
/// the caller serializes the collection.
pub fn run_batch<R, T, F>(
    records: &mut [R],
    factory: F,
    config: &BatchConfig,
) -> BatchResult<()>
where
    R: Send,
    T: Transform<R>,
    F: Fn() -> T + Sync,
{
    run_batch_with(records, factory, config, io::stdout(), &CancelToken::new())
}

/// [`run_batch`] with an explicit status sink and cancellation token.
///
/// Cancelling the token makes workers stop at their next chunk boundary and
/// the call return [`BatchError::Cancelled`].
pub fn run_batch_with<R, T, F, W>(
    records: &mut [R],
    factory: F,
    config: &BatchConfig,
    sink: W,
    cancel: &CancelToken,
) -> BatchResult<()>
where
    R: Send,
    T: Transform<R>,
    F: Fn() -> T + Sync,
    W: io::Write + Send,
{
    config.validate()?;

    let cursor = WorkCursor::new(records);
    let total = cursor.total();
    let processed = AtomicU64::new(0);

    // Captured before any worker starts so the monitor's first reading has
    // a meaningful elapsed time.
    let start = Instant::now();

    let worker_results = std::thread::scope(|scope| {
        // ── Workers ───────────────────────────────────────────────────────
        let handles: Vec<_> = (0..config.threads)
            .map(|_| {
                let cursor = &cursor;
                let factory = &factory;
                let processed = &processed;
                let abort = cancel.clone();
                let chunk_size = config.chunk_size;
                scope.spawn(move || {
                    // Per-worker transform state: built here, on the worker
                    // thread, once — never shared.
                    run_worker(cursor, factory(), processed, &abort, chunk_size)
                })
            })
            .collect();

        // ── Monitor ───────────────────────────────────────────────────────
        let monitor = ProgressMonitor::new(
            &config.label,
            total,
            &processed,
            cancel,
            start,
            config.report_interval,
            sink,
        );
        let monitor_handle = scope.spawn(move || monitor.run());

        // ── Join: all workers first, then the monitor ─────────────────────
        let mut results = Vec::with_capacity(handles.len());
        let mut panic_payload = None;
        for handle in handles {
            match handle.join() {
                Ok(result) => results.push(result),
                Err(payload) => {
                    // Unblock the monitor before re-raising the panic.
                    cancel.cancel();
                    panic_payload.get_or_insert(payload);
                }
            }
        }

        let _ = monitor_handle.join();

        if let Some(payload) = panic_payload {
            std::panic::resume_unwind(payload);
        }
        results
    });

    // ── Outcome ───────────────────────────────────────────────────────────
    //
    // A worker that fails returns the domain error and trips the flag;
    // siblings then report Cancelled.  Surface the originating error, and
    // Cancelled only when cancellation was the sole cause.
    let mut cancelled = false;
    for result in worker_results {
        match result {
            Ok(()) => {}
            Err(BatchError::Cancelled) => cancelled = true,
            Err(e) => return Err(e),
        }
    }
    if cancelled {
        return Err(BatchError::Cancelled);
    }

    debug_assert_eq!(
        processed.load(Ordering::Relaxed) as usize,
        total,
        "progress counter must equal the record count after a clean run"
    );
    Ok(())
}
