//! Integration tests for prep-batch.

use std::io::Write;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::cursor::WorkCursor;
use crate::engine::{run_batch, run_batch_with, BatchConfig};
use crate::monitor::ProgressMonitor;
use crate::transform::{CancelToken, Transform};
use crate::{BatchError, BatchResult};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A `Write` sink that collects everything into a shared buffer, so tests
/// can inspect monitor output after the run has joined.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Fast-polling config so tests never wait on the 1 s default interval.
fn test_config(label: &str, threads: usize) -> BatchConfig {
    BatchConfig::new(label, threads).report_interval(Duration::from_millis(1))
}

fn increment() -> impl FnMut(&mut u32) -> BatchResult<()> {
    |record: &mut u32| {
        *record += 1;
        Ok(())
    }
}

// ── Work cursor ───────────────────────────────────────────────────────────────

mod cursor_tests {
    use super::*;

    #[test]
    fn withdrawal_partitions_input_exactly() {
        let mut records: Vec<u32> = (0..1_000).collect();
        let cursor = WorkCursor::new(&mut records);

        let mut seen = Vec::new();
        loop {
            let chunk = cursor.withdraw(64);
            if chunk.is_empty() {
                break;
            }
            seen.extend(chunk.iter().copied());
        }

        // Every record delivered exactly once, in original order.
        assert_eq!(seen, (0..1_000).collect::<Vec<u32>>());
    }

    #[test]
    fn chunk_sizes_for_25000_records_at_10000() {
        let mut records = vec![0u8; 25_000];
        let cursor = WorkCursor::new(&mut records);
        assert_eq!(cursor.total(), 25_000);

        assert_eq!(cursor.withdraw(10_000).len(), 10_000);
        assert_eq!(cursor.withdraw(10_000).len(), 10_000);
        assert_eq!(cursor.withdraw(10_000).len(), 5_000);
        // Exhausted exactly once; every later call stays empty.
        assert_eq!(cursor.withdraw(10_000).len(), 0);
        assert_eq!(cursor.withdraw(10_000).len(), 0);
    }

    #[test]
    fn order_preserved_within_a_chunk() {
        let mut records: Vec<u32> = (0..100).collect();
        let cursor = WorkCursor::new(&mut records);
        let chunk = cursor.withdraw(30);
        assert_eq!(chunk, (0..30).collect::<Vec<u32>>().as_slice());
        let chunk = cursor.withdraw(30);
        assert_eq!(chunk, (30..60).collect::<Vec<u32>>().as_slice());
    }

    #[test]
    fn empty_input_yields_empty_chunk_immediately() {
        let mut records: Vec<u32> = vec![];
        let cursor = WorkCursor::new(&mut records);
        assert_eq!(cursor.total(), 0);
        assert!(cursor.withdraw(10).is_empty());
    }

    #[test]
    fn concurrent_withdrawal_never_duplicates() {
        // 8 threads drain 10,000 records in chunks of 7 (odd size to force
        // a ragged final chunk).  Each record is a counter bumped by the
        // withdrawing thread; exclusivity of &mut chunks means no atomics
        // are needed on the records themselves.
        let mut records = vec![0u32; 10_000];
        let cursor = WorkCursor::new(&mut records);
        let withdrawn = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| loop {
                    let chunk = cursor.withdraw(7);
                    if chunk.is_empty() {
                        return;
                    }
                    withdrawn.fetch_add(chunk.len(), Ordering::Relaxed);
                    for record in chunk {
                        *record += 1;
                    }
                });
            }
        });

        assert_eq!(withdrawn.load(Ordering::Relaxed), 10_000);
        assert!(records.iter().all(|&r| r == 1), "every record visited exactly once");
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

mod engine_tests {
    use super::*;

    #[test]
    fn processes_every_record_exactly_once() {
        // 25,000 records, chunk 10,000, 4 threads: three chunks, one ragged.
        let mut records = vec![0u32; 25_000];
        let config = test_config("Test", 4).chunk_size(10_000);
        let sink = SharedSink::default();

        run_batch_with(&mut records, increment, &config, sink.clone(), &CancelToken::new())
            .unwrap();

        assert!(records.iter().all(|&r| r == 1));
        // The monitor's last line reports completion.
        let output = sink.contents();
        let last = output.lines().last().unwrap();
        assert!(last.contains("25000/25000"), "unexpected final line: {last}");
        assert!(last.contains("(100.00%)"), "unexpected final line: {last}");
    }

    #[test]
    fn single_thread_processes_in_source_order() {
        // A single worker sees every record in source order.
        let mut records: Vec<u32> = vec![10, 20, 30];
        let log = Arc::new(Mutex::new(Vec::new()));

        let factory = {
            let log = Arc::clone(&log);
            move || {
                let log = Arc::clone(&log);
                move |record: &mut u32| -> BatchResult<()> {
                    log.lock().unwrap().push(*record);
                    Ok(())
                }
            }
        };

        run_batch_with(
            &mut records,
            factory,
            &test_config("Test", 1),
            SharedSink::default(),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(*log.lock().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn empty_run_terminates_and_reports() {
        let mut records: Vec<u32> = vec![];
        let sink = SharedSink::default();
        run_batch_with(&mut records, increment, &test_config("Empty", 3), sink.clone(),
            &CancelToken::new())
        .unwrap();

        // At least one status line, no division-by-zero panic.
        let output = sink.contents();
        assert!(output.contains("Empty: 0/0 (100.00%)"), "got: {output}");
    }

    #[test]
    fn factory_called_once_per_worker() {
        let instantiations = Arc::new(AtomicUsize::new(0));
        let mut records = vec![0u32; 5_000];

        let factory = {
            let instantiations = Arc::clone(&instantiations);
            move || {
                instantiations.fetch_add(1, Ordering::Relaxed);
                |record: &mut u32| -> BatchResult<()> {
                    *record += 1;
                    Ok(())
                }
            }
        };

        run_batch_with(
            &mut records,
            factory,
            &test_config("Test", 4).chunk_size(100),
            SharedSink::default(),
            &CancelToken::new(),
        )
        .unwrap();

        // One transform per worker, not one per record or per chunk.
        assert_eq!(instantiations.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn config_validation_rejects_zero_threads_and_chunks() {
        let mut records = vec![0u32; 10];

        let result = run_batch(&mut records, increment, &BatchConfig::new("Test", 0));
        assert!(matches!(result, Err(BatchError::Config(_))));

        let result = run_batch(
            &mut records,
            increment,
            &BatchConfig::new("Test", 1).chunk_size(0),
        );
        assert!(matches!(result, Err(BatchError::Config(_))));

        // No partial run happened.
        assert!(records.iter().all(|&r| r == 0));
    }

    #[test]
    fn closure_transform_via_run_batch_defaults() {
        // Smoke-test the stdout path with a tiny input.
        let mut records = vec![0u32; 3];
        run_batch(
            &mut records,
            increment,
            &BatchConfig::new("Smoke", 2).report_interval(Duration::from_millis(1)),
        )
        .unwrap();
        assert_eq!(records, vec![1, 1, 1]);
    }
}

// ── Failure and cancellation ──────────────────────────────────────────────────

mod failure_tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("record rejected")]
    struct Rejected;

    #[test]
    fn transform_error_aborts_run() {
        let mut records: Vec<u32> = (0..5_000).collect();

        let factory = || {
            |record: &mut u32| -> BatchResult<()> {
                if *record == 4_000 {
                    return Err(BatchError::transform(Rejected));
                }
                Ok(())
            }
        };

        let result = run_batch_with(
            &mut records,
            factory,
            &test_config("Failing", 4).chunk_size(100),
            SharedSink::default(),
            &CancelToken::new(),
        );

        // The originating error wins over sibling Cancelled results.
        assert!(matches!(result, Err(BatchError::Transform(_))));
    }

    #[test]
    fn siblings_stop_after_first_failure() {
        // Fail on the very first record; with large input and small chunks,
        // siblings must bail out early instead of draining the cursor.
        let mut records: Vec<u32> = (0..100_000).collect();
        let touched = Arc::new(AtomicUsize::new(0));

        let factory = {
            let touched = Arc::clone(&touched);
            move || {
                let touched = Arc::clone(&touched);
                move |record: &mut u32| -> BatchResult<()> {
                    if *record == 0 {
                        return Err(BatchError::transform(Rejected));
                    }
                    touched.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
            }
        };

        let result = run_batch_with(
            &mut records,
            factory,
            &test_config("Failing", 4).chunk_size(10),
            SharedSink::default(),
            &CancelToken::new(),
        );

        assert!(result.is_err());
        assert!(
            touched.load(Ordering::Relaxed) < 100_000,
            "siblings should not have drained the whole cursor"
        );
    }

    #[test]
    fn pre_cancelled_token_cancels_run() {
        let mut records = vec![0u32; 1_000];
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run_batch_with(
            &mut records,
            increment,
            &test_config("Cancelled", 2),
            SharedSink::default(),
            &cancel,
        );

        assert!(matches!(result, Err(BatchError::Cancelled)));
        assert!(records.iter().all(|&r| r == 0), "no record should be processed");
    }
}

// ── Sub-results ───────────────────────────────────────────────────────────────

mod sub_result_tests {
    use super::*;

    /// A record producing one sub-result per unit of `problems`, counted
    /// once regardless.
    struct Job {
        problems: usize,
        accepted: usize,
    }

    struct Expand;

    impl Transform<Job> for Expand {
        type Output = usize;

        fn apply(&mut self, record: &mut Job) -> BatchResult<Vec<usize>> {
            Ok((0..record.problems).collect())
        }

        fn accept(&mut self, record: &mut Job, _output: usize) -> BatchResult<()> {
            record.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn accept_called_per_sub_result_increment_once_per_record() {
        // Jobs with 0, 1, and 3 sub-results each.
        let mut records = vec![
            Job { problems: 0, accepted: 0 },
            Job { problems: 1, accepted: 0 },
            Job { problems: 3, accepted: 0 },
        ];
        let sink = SharedSink::default();

        run_batch_with(&mut records, || Expand, &test_config("Solve", 1), sink.clone(),
            &CancelToken::new())
        .unwrap();

        let accepted: Vec<usize> = records.iter().map(|j| j.accepted).collect();
        assert_eq!(accepted, vec![0, 1, 3]);

        // Progress counted records, not sub-results: final line says 3/3.
        let output = sink.contents();
        assert!(output.lines().last().unwrap().contains("3/3"), "got: {output}");
    }
}

// ── Monitor ───────────────────────────────────────────────────────────────────

mod monitor_tests {
    use super::*;

    fn monitor<'a>(
        total: usize,
        processed: &'a AtomicU64,
        abort: &'a CancelToken,
        sink: SharedSink,
    ) -> ProgressMonitor<'a, SharedSink> {
        ProgressMonitor::new(
            "Test",
            total,
            processed,
            abort,
            Instant::now(),
            Duration::from_millis(1),
            sink,
        )
    }

    #[test]
    fn eta_unknown_before_any_progress() {
        let processed = AtomicU64::new(0);
        let abort = CancelToken::new();
        let m = monitor(100, &processed, &abort, SharedSink::default());
        let line = m.format_line(0, Duration::ZERO);
        assert_eq!(line, "Test: 0/100 (0.00%), ETA: unknown");
    }

    #[test]
    fn eta_from_observed_throughput() {
        let processed = AtomicU64::new(0);
        let abort = CancelToken::new();
        let m = monitor(100, &processed, &abort, SharedSink::default());
        // 50 records in 10 s → 5 records/s → 50 remaining → 10 s.
        let line = m.format_line(50, Duration::from_secs(10));
        assert_eq!(line, "Test: 50/100 (50.00%), ETA: 00:00:10");
    }

    #[test]
    fn eta_zero_at_completion() {
        let processed = AtomicU64::new(0);
        let abort = CancelToken::new();
        let m = monitor(100, &processed, &abort, SharedSink::default());
        let line = m.format_line(100, Duration::from_secs(3));
        assert_eq!(line, "Test: 100/100 (100.00%), ETA: 00:00:00");
    }

    #[test]
    fn empty_total_reports_without_dividing_by_zero() {
        let processed = AtomicU64::new(0);
        let abort = CancelToken::new();
        let m = monitor(0, &processed, &abort, SharedSink::default());
        let line = m.format_line(0, Duration::ZERO);
        assert_eq!(line, "Test: 0/0 (100.00%), ETA: 00:00:00");
    }

    #[test]
    fn run_emits_at_least_one_line_and_terminates() {
        let processed = AtomicU64::new(42);
        let abort = CancelToken::new();
        let sink = SharedSink::default();
        // Counter already at total — loop must still emit once, then exit.
        monitor(42, &processed, &abort, sink.clone()).run();

        let output = sink.contents();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("42/42 (100.00%)"), "got: {output}");
    }

    #[test]
    fn run_exits_on_abort_flag() {
        let processed = AtomicU64::new(5);
        let abort = CancelToken::new();
        abort.cancel();
        let sink = SharedSink::default();
        // total not reached, but the abort flag must end the loop.
        monitor(100, &processed, &abort, sink.clone()).run();
        assert!(sink.contents().contains("5/100"), "got: {}", sink.contents());
    }
}
