//! `prep-batch` — the concurrent batch-processing engine.
//!
//! Both preparation phases (plan routing and location assignment) are
//! embarrassingly parallel per-person transformations over a large
//! population.  This crate implements the shared machinery once:
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`cursor`]    | `WorkCursor` — thread-safe chunked withdrawal          |
//! | [`transform`] | `Transform` trait and `CancelToken`                    |
//! | [`worker`]    | The per-thread processing loop                         |
//! | [`monitor`]   | `ProgressMonitor` — throughput and ETA reporting       |
//! | [`engine`]    | `run_batch` — wires cursor, workers, and monitor       |
//! | [`error`]     | `BatchError`, `BatchResult`                            |
//!
//! # Execution model
//!
//! [`run_batch`] splits a `&mut [R]` into disjoint chunks through a
//! mutex-guarded [`WorkCursor`].  `threads` worker threads repeatedly
//! withdraw a chunk (default 10,000 records) and apply a caller-supplied
//! [`Transform`], built once per worker from a factory closure so per-thread
//! state (routers, solvers, caches) is never shared.  A single atomic
//! counter tracks completed records; one monitor thread samples it at a
//! fixed interval and prints progress and ETA until completion.
//!
//! Records within a chunk are processed in collection order by one worker;
//! no ordering holds across chunks.  The first `Err` from a transform
//! aborts the run: the failing worker trips the shared cancel flag,
//! siblings stop at their next chunk boundary, and the error propagates
//! from `run_batch`.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = BatchConfig::new("Routing", 4);
//! run_batch(&mut persons, || PlanRouterTransform::new(&network), &config)?;
//! write_population_csv(&output_path, &persons)?;   // persist only on success
//! ```

pub mod cursor;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod transform;
pub mod worker;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cursor::WorkCursor;
pub use engine::{run_batch, run_batch_with, BatchConfig, DEFAULT_CHUNK_SIZE};
pub use error::{BatchError, BatchResult};
pub use monitor::ProgressMonitor;
pub use transform::{CancelToken, Transform};
