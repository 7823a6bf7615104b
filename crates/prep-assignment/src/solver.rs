//! Iterative sample-and-match solver for one assignment problem.
//!
//! Each iteration walks the chain forward from the start anchor: sample a
//! target distance for the incoming leg's mode, pick the facility whose
//! distance best matches it, move on.  The closing leg to the end anchor is
//! scored too.  An iteration is accepted when every leg's deviation from its
//! sampled target is under the per-mode threshold; otherwise the attempt
//! with the smallest worst relative deviation is kept when the iteration cap
//! is reached.

use rustc_hash::FxHashMap;

use prep_core::{Coord, FacilityId, Mode};
use prep_population::Plan;

use crate::error::{AssignmentError, AssignmentResult};
use crate::index::FacilityIndex;
use crate::problem::AssignmentProblem;
use crate::sampler::DistanceSampler;

// ── SolverConfig ──────────────────────────────────────────────────────────────

/// Iteration cap and per-mode acceptance thresholds in metres.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub max_iterations: u32,
    pub thresholds: FxHashMap<Mode, f64>,
}

impl Default for SolverConfig {
    /// Network modes tolerate 200 m of deviation, active modes 100 m.
    fn default() -> Self {
        let mut thresholds = FxHashMap::default();
        thresholds.insert(Mode::Car, 200.0);
        thresholds.insert(Mode::Pt, 200.0);
        thresholds.insert(Mode::Bike, 100.0);
        thresholds.insert(Mode::Walk, 100.0);
        Self { max_iterations: 1_000, thresholds }
    }
}

impl SolverConfig {
    pub fn threshold(&self, mode: Mode) -> f64 {
        self.thresholds.get(&mode).copied().unwrap_or(200.0)
    }
}

// ── Solution ──────────────────────────────────────────────────────────────────

/// A solved problem: one facility choice per chain activity, in chain order.
#[derive(Clone, Debug)]
pub struct Solution {
    pub problem: AssignmentProblem,
    pub choices: Vec<(FacilityId, Coord)>,
    /// Worst per-leg deviation relative to its threshold; `<= 1.0` means
    /// every leg met its threshold.
    pub worst_relative_deviation: f64,
}

// ── AssignmentSolver ──────────────────────────────────────────────────────────

/// Solves assignment problems against a facility index.
///
/// One solver exists per worker thread; the index is shared, the sampler is
/// private to the solver.
pub struct AssignmentSolver<'a, S: DistanceSampler> {
    index: &'a FacilityIndex,
    sampler: S,
    config: SolverConfig,
}

impl<'a, S: DistanceSampler> AssignmentSolver<'a, S> {
    pub fn new(index: &'a FacilityIndex, sampler: S, config: SolverConfig) -> Self {
        Self { index, sampler, config }
    }

    /// Solve one problem of `plan`.
    ///
    /// Errors if a leg's mode has no distance distribution or a chain
    /// activity's kind has no facilities at all; both are data problems no
    /// further iteration can fix.
    pub fn solve(
        &mut self,
        plan: &Plan,
        problem: &AssignmentProblem,
    ) -> AssignmentResult<Solution> {
        let start = plan.activity(problem.anchor_start).coord;
        let end = plan.activity(problem.anchor_end).coord;

        let mut best = self.attempt(plan, problem, start, end)?;
        for _ in 1..self.config.max_iterations {
            if best.worst_relative_deviation <= 1.0 {
                break;
            }
            let attempt = self.attempt(plan, problem, start, end)?;
            if attempt.worst_relative_deviation < best.worst_relative_deviation {
                best = attempt;
            }
        }
        Ok(best)
    }

    /// One sample-and-match pass over the chain.
    fn attempt(
        &mut self,
        plan: &Plan,
        problem: &AssignmentProblem,
        start: Coord,
        end: Coord,
    ) -> AssignmentResult<Solution> {
        let mut choices = Vec::with_capacity(problem.chain.len());
        let mut worst = 0.0f64;
        let mut center = start;

        for (k, &activity_idx) in problem.chain.iter().enumerate() {
            let mode = problem.modes[k];
            let target = self
                .sampler
                .sample(mode)
                .ok_or(AssignmentError::NoDistribution(mode))?;
            let kind = &plan.activity(activity_idx).kind;
            let (id, coord) = self
                .index
                .best_match(kind, center, target)
                .ok_or_else(|| AssignmentError::NoFacilities(kind.clone()))?;

            let dev = (center.distance_m(coord) - target).abs();
            worst = worst.max(dev / self.config.threshold(mode));
            choices.push((id, coord));
            center = coord;
        }

        // Closing leg back to the fixed end anchor.  With n chain entries
        // there are n + 1 modes; the last one belongs to this leg.
        let closing_mode = problem.modes[problem.chain.len()];
        let target = self
            .sampler
            .sample(closing_mode)
            .ok_or(AssignmentError::NoDistribution(closing_mode))?;
        let dev = (center.distance_m(end) - target).abs();
        worst = worst.max(dev / self.config.threshold(closing_mode));

        Ok(Solution {
            problem: problem.clone(),
            choices,
            worst_relative_deviation: worst,
        })
    }
}
