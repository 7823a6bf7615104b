//! Extraction of assignment problems from plans.
//!
//! A *problem* is a maximal run of consecutive variable activities strictly
//! between two fixed anchors.  The anchors keep their coordinates; the run's
//! activities get relocated by the solver.  Runs that touch the first or last
//! activity of a plan have no anchor on one side and are skipped.

use prep_core::Mode;
use prep_population::Plan;

/// One relocation problem: a chain of variable activities between two fixed
/// anchors, with the modes of the legs along the chain.
///
/// Indices are plan activity indices (as used by [`Plan::activity`]).  With
/// `n = chain.len()`, `modes` has `n + 1` entries: leg `0` goes from
/// `anchor_start` to `chain[0]`, leg `n` from `chain[n-1]` to `anchor_end`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentProblem {
    /// Activity indices of the variable activities, in plan order.
    pub chain: Vec<usize>,
    /// Activity index of the fixed anchor before the chain.
    pub anchor_start: usize,
    /// Activity index of the fixed anchor after the chain.
    pub anchor_end: usize,
    /// Leg modes along `anchor_start → chain[0] → … → anchor_end`.
    pub modes: Vec<Mode>,
}

/// Find all assignment problems of a plan.
///
/// `variable_kinds` names the activity kinds to relocate (typically
/// `leisure`, `shop`, `service`); every other kind is a fixed anchor.
pub fn find_problems(plan: &Plan, variable_kinds: &[&str]) -> Vec<AssignmentProblem> {
    if plan.is_empty() {
        return Vec::new();
    }
    let n_activities = plan.leg_count() + 1;
    let is_variable =
        |i: usize| variable_kinds.contains(&plan.activity(i).kind.as_str());

    let mut problems = Vec::new();
    let mut i = 0;
    while i < n_activities {
        if !is_variable(i) {
            i += 1;
            continue;
        }
        let start = i;
        while i < n_activities && is_variable(i) {
            i += 1;
        }
        // Runs at the plan edges have no anchor on one side.
        if start == 0 || i == n_activities {
            continue;
        }
        let chain: Vec<usize> = (start..i).collect();
        // Leg k connects activity k to activity k + 1.
        let modes: Vec<Mode> = (start - 1..i).map(|k| plan.leg(k).mode).collect();
        problems.push(AssignmentProblem {
            chain,
            anchor_start: start - 1,
            anchor_end: i,
            modes,
        });
    }
    problems
}
