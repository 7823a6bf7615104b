//! `ProgressMonitor` — periodic throughput and ETA reporting.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use prep_core::write_time;

use crate::transform::CancelToken;

/// Samples the shared progress counter at a fixed interval and writes one
/// status line per sample:
///
/// ```text
/// Routing: 18000/25000 (72.00%), ETA: 00:00:03
/// ```
///
/// The monitor never blocks the workers — it reads one atomic and sleeps in
/// between (no spinning).  It terminates after the first sample that
/// observes completion or the abort flag; the sleep-first loop guarantees
/// at least one line is emitted even when `total == 0` or the workers
/// finish before the first interval elapses.
///
/// Write errors on the sink are ignored: progress output is best-effort
/// and must never take down a run.
pub struct ProgressMonitor<'a, W: Write> {
    label: &'a str,
    total: usize,
    processed: &'a AtomicU64,
    abort: &'a CancelToken,
    /// Captured by the engine before any worker starts, so the very first
    /// sample already has a meaningful elapsed time.
    start: Instant,
    interval: Duration,
    sink: W,
}

impl<'a, W: Write> ProgressMonitor<'a, W> {
    pub fn new(
        label: &'a str,
        total: usize,
        processed: &'a AtomicU64,
        abort: &'a CancelToken,
        start: Instant,
        interval: Duration,
        sink: W,
    ) -> Self {
        Self { label, total, processed, abort, start, interval, sink }
    }

    /// Sample, report, and sleep until completion or abort.
    pub fn run(mut self) {
        loop {
            std::thread::sleep(self.interval);

            let processed = self.processed.load(Ordering::Relaxed) as usize;
            let line = self.status_line(processed, self.start.elapsed());
            let _ = writeln!(self.sink, "{line}");

            if processed >= self.total || self.abort.is_cancelled() {
                return;
            }
        }
    }

    /// Format one status line for `processed` records after `elapsed`.
    ///
    /// The arithmetic edge cases are handled here, never raised: with zero
    /// elapsed time or zero throughput the ETA renders as `unknown`, and an
    /// empty run reports 100 % instead of dividing by zero.
    fn status_line(&self, processed: usize, elapsed: Duration) -> String {
        let percent = if self.total == 0 {
            100.0
        } else {
            100.0 * processed as f64 / self.total as f64
        };

        let remaining = self.total.saturating_sub(processed);
        let elapsed_s = elapsed.as_secs_f64();

        let eta = if remaining == 0 {
            write_time(0.0)
        } else if processed == 0 || elapsed_s <= 0.0 {
            // Throughput undefined — nothing processed yet.
            "unknown".to_string()
        } else {
            let rate = processed as f64 / elapsed_s;
            write_time((remaining as f64 / rate).ceil())
        };

        format!(
            "{}: {}/{} ({:.2}%), ETA: {}",
            self.label, processed, self.total, percent, eta
        )
    }
}

#[cfg(test)]
impl<W: Write> ProgressMonitor<'_, W> {
    /// Test-only access to the line formatter.
    pub(crate) fn format_line(&self, processed: usize, elapsed: Duration) -> String {
        self.status_line(processed, elapsed)
    }
}
