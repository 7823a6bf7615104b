//! Plan types: `Activity`, `Leg`, `Route`, and the alternating `Plan`.
//!
//! # Structure invariant
//!
//! A non-empty plan is an alternating sequence
//!
//! ```text
//! Activity, Leg, Activity, Leg, …, Activity
//! ```
//!
//! starting and ending with an activity.  [`Plan::new`] enforces this; all
//! other accessors may rely on it.  A plan with `n` legs therefore has
//! `n + 1` activities, and leg `i` connects activity `i` to activity `i+1`.
//!
//! # Mutability model
//!
//! The preparation transforms mutate plan *contents* (routes, facilities,
//! snapped links) but never the element structure, so indices computed
//! before a transform remain valid after it.

use prep_core::{Coord, FacilityId, LinkId, Mode};

use crate::PopulationError;

// ── Activity ──────────────────────────────────────────────────────────────────

/// A stay at one location for one purpose.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Activity {
    /// Purpose, e.g. `"home"`, `"work"`, `"leisure"`, `"shop"`, `"service"`.
    pub kind: String,

    /// Location in the projected CRS.  Updated by location assignment for
    /// variable activities.
    pub coord: Coord,

    /// Network link the activity is attached to.  `LinkId::INVALID` until
    /// the snapping step of the routing transform fills it in.
    pub link: LinkId,

    /// Facility the activity takes place at.  `FacilityId::INVALID` for
    /// activities without an assigned facility (fixed anchors keep their
    /// input coordinate instead).
    pub facility: FacilityId,

    /// Seconds since midnight at which the activity ends; `None` for the
    /// final open-ended activity of the day.
    pub end_time: Option<f64>,
}

impl Activity {
    /// A bare activity at `coord` with no link, facility, or end time.
    pub fn new(kind: impl Into<String>, coord: Coord) -> Self {
        Self {
            kind:     kind.into(),
            coord,
            link:     LinkId::INVALID,
            facility: FacilityId::INVALID,
            end_time: None,
        }
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

// ── Leg and Route ─────────────────────────────────────────────────────────────

/// The result of routing one leg.
///
/// Network legs carry the traversed links; teleported legs have an empty
/// link list and only distance and travel time.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Route {
    /// Links traversed in order, empty for teleported legs.
    pub links: Vec<LinkId>,
    /// Total distance in metres.
    pub distance_m: f64,
    /// Total travel time in seconds.
    pub travel_time_s: f64,
}

/// A movement between two consecutive activities.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Leg {
    pub mode: Mode,
    /// `None` until the routing transform has processed the plan.
    pub route: Option<Route>,
}

impl Leg {
    pub fn new(mode: Mode) -> Self {
        Self { mode, route: None }
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// One element of a plan's alternating sequence.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PlanElement {
    Activity(Activity),
    Leg(Leg),
}

/// A person's selected daily plan.
#[derive(Clone, Debug, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Plan {
    elements: Vec<PlanElement>,
}

impl Plan {
    /// Construct a plan, validating the activity/leg alternation invariant.
    pub fn new(elements: Vec<PlanElement>) -> Result<Self, PopulationError> {
        if elements.is_empty() {
            return Ok(Self { elements });
        }
        for (i, element) in elements.iter().enumerate() {
            let want_activity = i % 2 == 0;
            let is_activity = matches!(element, PlanElement::Activity(_));
            if want_activity != is_activity {
                return Err(PopulationError::MalformedPlan(format!(
                    "element {i} should be {}",
                    if want_activity { "an activity" } else { "a leg" }
                )));
            }
        }
        if elements.len() % 2 == 0 {
            return Err(PopulationError::MalformedPlan(
                "plan must end with an activity".to_string(),
            ));
        }
        Ok(Self { elements })
    }

    /// An empty plan (a person who stays home all day without a recorded
    /// activity; skipped by all transforms).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Read-only view of the raw element sequence.
    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [PlanElement] {
        &mut self.elements
    }

    /// Number of legs (= trips) in the plan.
    pub fn leg_count(&self) -> usize {
        self.elements.len() / 2
    }

    // ── Typed accessors ───────────────────────────────────────────────────

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.elements.iter().filter_map(|e| match e {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        })
    }

    pub fn activities_mut(&mut self) -> impl Iterator<Item = &mut Activity> {
        self.elements.iter_mut().filter_map(|e| match e {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        })
    }

    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.elements.iter().filter_map(|e| match e {
            PlanElement::Leg(l) => Some(l),
            PlanElement::Activity(_) => None,
        })
    }

    pub fn legs_mut(&mut self) -> impl Iterator<Item = &mut Leg> {
        self.elements.iter_mut().filter_map(|e| match e {
            PlanElement::Leg(l) => Some(l),
            PlanElement::Activity(_) => None,
        })
    }

    /// The `i`-th activity (0-based, in plan order).
    ///
    /// # Panics
    /// Panics if `i > leg_count()` — the caller is expected to stay within
    /// the structure established at construction.
    pub fn activity(&self, i: usize) -> &Activity {
        match &self.elements[i * 2] {
            PlanElement::Activity(a) => a,
            // Unreachable: Plan::new enforced alternation.
            PlanElement::Leg(_) => unreachable!("alternation invariant violated"),
        }
    }

    pub fn activity_mut(&mut self, i: usize) -> &mut Activity {
        match &mut self.elements[i * 2] {
            PlanElement::Activity(a) => a,
            PlanElement::Leg(_) => unreachable!("alternation invariant violated"),
        }
    }

    /// The `i`-th leg, connecting activity `i` to activity `i + 1`.
    pub fn leg(&self, i: usize) -> &Leg {
        match &self.elements[i * 2 + 1] {
            PlanElement::Leg(l) => l,
            PlanElement::Activity(_) => unreachable!("alternation invariant violated"),
        }
    }

    pub fn leg_mut(&mut self, i: usize) -> &mut Leg {
        match &mut self.elements[i * 2 + 1] {
            PlanElement::Leg(l) => l,
            PlanElement::Activity(_) => unreachable!("alternation invariant violated"),
        }
    }
}
