//! Empirical per-mode distance distributions.
//!
//! # CSV format
//!
//! One row per (mode, quantile) support point:
//!
//! ```csv
//! mode,quantile,distance_m
//! car,0.0,300.0
//! car,0.5,2500.0
//! car,1.0,20000.0
//! walk,0.0,50.0
//! walk,1.0,1200.0
//! ```
//!
//! Quantiles must cover `[0, 1]`; sampling draws a uniform `u` and linearly
//! interpolates between the bracketing support points.  Rows per mode may
//! appear in any order — they are sorted on load.

use std::io::Read;
use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use prep_core::Mode;

use crate::AssignmentError;

// ── DistanceSampler trait ─────────────────────────────────────────────────────

/// Draws a target leg distance for a mode.
///
/// `&mut self`: samplers carry their RNG.  One sampler exists per worker
/// thread; the solver maps `None` (unknown mode) to a fatal error.
pub trait DistanceSampler {
    fn sample(&mut self, mode: Mode) -> Option<f64>;
}

// ── EmpiricalDistances ────────────────────────────────────────────────────────

/// Immutable per-mode quantile tables, shared across workers.
///
/// Each worker obtains its own [`EmpiricalDistanceSampler`] via
/// [`sampler`][Self::sampler] with a distinct seed, so parallel runs never
/// contend on an RNG.
#[derive(Clone, Debug, Default)]
pub struct EmpiricalDistances {
    /// Per mode: (quantile, distance) support points sorted by quantile.
    tables: FxHashMap<Mode, Vec<(f64, f64)>>,
}

impl EmpiricalDistances {
    /// Build directly from per-mode support points (tests, synthetic data).
    pub fn from_tables(tables: FxHashMap<Mode, Vec<(f64, f64)>>) -> Self {
        let mut tables = tables;
        for points in tables.values_mut() {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        Self { tables }
    }

    pub fn has_mode(&self, mode: Mode) -> bool {
        self.tables.contains_key(&mode)
    }

    /// Distance at quantile `u` (clamped to `[0, 1]`), linearly
    /// interpolated; `None` if the mode has no table.
    pub fn quantile(&self, mode: Mode, u: f64) -> Option<f64> {
        let points = self.tables.get(&mode)?;
        let u = u.clamp(0.0, 1.0);

        let first = points.first()?;
        if u <= first.0 {
            return Some(first.1);
        }
        for window in points.windows(2) {
            let (q0, d0) = window[0];
            let (q1, d1) = window[1];
            if u <= q1 {
                if q1 == q0 {
                    return Some(d1);
                }
                let t = (u - q0) / (q1 - q0);
                return Some(d0 + t * (d1 - d0));
            }
        }
        points.last().map(|&(_, d)| d)
    }

    /// A per-worker sampler over these tables.
    pub fn sampler(&self, seed: u64) -> EmpiricalDistanceSampler<'_> {
        EmpiricalDistanceSampler {
            distances: self,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

// ── EmpiricalDistanceSampler ──────────────────────────────────────────────────

/// Per-worker sampler: shared tables plus a private seeded RNG.
pub struct EmpiricalDistanceSampler<'a> {
    distances: &'a EmpiricalDistances,
    rng: SmallRng,
}

impl DistanceSampler for EmpiricalDistanceSampler<'_> {
    fn sample(&mut self, mode: Mode) -> Option<f64> {
        let u: f64 = self.rng.r#gen();
        self.distances.quantile(mode, u)
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DistanceRow {
    mode: String,
    quantile: f64,
    distance_m: f64,
}

/// Load distance distributions from a CSV file.
pub fn load_distances_csv(path: &Path) -> Result<EmpiricalDistances, AssignmentError> {
    let file = std::fs::File::open(path).map_err(AssignmentError::Io)?;
    load_distances_reader(file)
}

/// Like [`load_distances_csv`] but accepts any `Read` source.
pub fn load_distances_reader<R: Read>(reader: R) -> Result<EmpiricalDistances, AssignmentError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tables: FxHashMap<Mode, Vec<(f64, f64)>> = FxHashMap::default();

    for result in csv_reader.deserialize::<DistanceRow>() {
        let row = result.map_err(|e| AssignmentError::Parse(e.to_string()))?;
        let mode: Mode = row
            .mode
            .parse::<Mode>()
            .map_err(|e| AssignmentError::Parse(e.to_string()))?;
        if !(0.0..=1.0).contains(&row.quantile) {
            return Err(AssignmentError::Parse(format!(
                "quantile {} out of [0, 1] for mode {}",
                row.quantile, mode
            )));
        }
        if row.distance_m < 0.0 {
            return Err(AssignmentError::Parse(format!(
                "negative distance {} for mode {}",
                row.distance_m, mode
            )));
        }
        tables.entry(mode).or_default().push((row.quantile, row.distance_m));
    }

    Ok(EmpiricalDistances::from_tables(tables))
}
