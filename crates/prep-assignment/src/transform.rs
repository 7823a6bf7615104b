//! `AssignmentTransform` — location assignment as a batch transform.
//!
//! `apply` extracts and solves one person's assignment problems; each
//! [`Solution`] comes back through `accept`, which writes the chosen
//! facility and coordinate into the plan's variable activities.

use prep_batch::{BatchError, BatchResult, Transform};
use prep_population::Person;

use crate::index::FacilityIndex;
use crate::problem::find_problems;
use crate::sampler::{EmpiricalDistanceSampler, EmpiricalDistances};
use crate::solver::{AssignmentSolver, Solution, SolverConfig};

/// Activity kinds relocated by default: everything people do not report a
/// fixed address for.
pub const DEFAULT_VARIABLE_KINDS: &[&str] = &["leisure", "shop", "service"];

/// Per-worker location-assignment transform.
///
/// Build one per worker via the engine's factory, passing a distinct
/// `seed` so parallel runs stay deterministic per worker count.
pub struct AssignmentTransform<'a> {
    solver: AssignmentSolver<'a, EmpiricalDistanceSampler<'a>>,
    variable_kinds: Vec<String>,
}

impl<'a> AssignmentTransform<'a> {
    pub fn new(
        index: &'a FacilityIndex,
        distances: &'a EmpiricalDistances,
        config: SolverConfig,
        seed: u64,
    ) -> Self {
        Self {
            solver: AssignmentSolver::new(index, distances.sampler(seed), config),
            variable_kinds: DEFAULT_VARIABLE_KINDS.iter().map(|&k| k.to_string()).collect(),
        }
    }

    /// Override the relocated activity kinds.
    pub fn variable_kinds(mut self, kinds: &[&str]) -> Self {
        self.variable_kinds = kinds.iter().map(|&k| k.to_string()).collect();
        self
    }
}

impl Transform<Person> for AssignmentTransform<'_> {
    type Output = Solution;

    fn apply(&mut self, person: &mut Person) -> BatchResult<Vec<Solution>> {
        if person.plan.is_empty() {
            return Ok(Vec::new());
        }
        let kinds: Vec<&str> = self.variable_kinds.iter().map(String::as_str).collect();
        let problems = find_problems(&person.plan, &kinds);

        let mut solutions = Vec::with_capacity(problems.len());
        for problem in &problems {
            let solution = self
                .solver
                .solve(&person.plan, problem)
                .map_err(BatchError::transform)?;
            solutions.push(solution);
        }
        Ok(solutions)
    }

    fn accept(&mut self, person: &mut Person, solution: Solution) -> BatchResult<()> {
        for (&activity_idx, &(facility, coord)) in
            solution.problem.chain.iter().zip(&solution.choices)
        {
            let activity = person.plan.activity_mut(activity_idx);
            activity.facility = facility;
            activity.coord = coord;
        }
        Ok(())
    }
}
