//! `prep-assignment` — the secondary-location assignment transform.
//!
//! Persons report *that* they go shopping or out for leisure, but not
//! *where*.  This crate assigns facilities to those variable activities:
//! leg distances are sampled from empirical per-mode distance
//! distributions, and for each variable activity the facility whose
//! distance best matches the sample is chosen, iterating until every leg's
//! deviation is under its per-mode threshold (or an iteration cap is hit,
//! keeping the best attempt).
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`sampler`]   | `DistanceSampler`, empirical quantile tables, CSV     |
//! | [`index`]     | `FacilityIndex` — per-kind R-tree candidate lookup    |
//! | [`problem`]   | `AssignmentProblem` extraction from plans             |
//! | [`solver`]    | `AssignmentSolver`, `Solution`, `SolverConfig`        |
//! | [`transform`] | `AssignmentTransform` for the batch engine            |
//!
//! The transform demonstrates the batch engine's sub-result path: `apply`
//! creates and solves the problems of one person's plan, and each
//! [`Solution`][solver::Solution] is written back through `accept` before
//! the person counts as processed.

pub mod error;
pub mod index;
pub mod problem;
pub mod sampler;
pub mod solver;
pub mod transform;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AssignmentError, AssignmentResult};
pub use index::FacilityIndex;
pub use problem::{find_problems, AssignmentProblem};
pub use sampler::{
    load_distances_csv, load_distances_reader, DistanceSampler, EmpiricalDistanceSampler,
    EmpiricalDistances,
};
pub use solver::{AssignmentSolver, Solution, SolverConfig};
pub use transform::{AssignmentTransform, DEFAULT_VARIABLE_KINDS};
