//! Per-mode routing modules and the `TripRouter` dispatcher.

use std::collections::HashMap;

use prep_core::Mode;
use prep_population::{Activity, Route};

use crate::network::LinkNetwork;
use crate::router::PathCalculator;
use crate::RoutingError;

// ── RoutingModule trait ───────────────────────────────────────────────────────

/// Routes one leg between two activities.
///
/// One module instance exists per mode per worker; `&mut self` allows
/// per-instance scratch state.
pub trait RoutingModule {
    fn route_leg(&mut self, from: &Activity, to: &Activity) -> Result<Route, RoutingError>;
}

// ── NetworkRoutingModule ──────────────────────────────────────────────────────

/// Routes over a link network between the activities' snapped links.
///
/// The path runs from the head node of the origin's link to the tail node
/// of the destination's link, so a trip enters the network where the origin
/// link ends and leaves it where the destination link begins — the origin
/// and destination links themselves are access/egress, not traversal.
pub struct NetworkRoutingModule<'n, C: PathCalculator> {
    network: &'n LinkNetwork,
    calculator: C,
}

impl<'n, C: PathCalculator> NetworkRoutingModule<'n, C> {
    /// `network` must be the same (sub)network the activities were snapped
    /// against — link IDs are only meaningful within one network.
    pub fn new(network: &'n LinkNetwork, calculator: C) -> Self {
        Self { network, calculator }
    }
}

impl<C: PathCalculator> RoutingModule for NetworkRoutingModule<'_, C> {
    fn route_leg(&mut self, from: &Activity, to: &Activity) -> Result<Route, RoutingError> {
        if from.link.index() >= self.network.link_count() {
            return Err(RoutingError::UnsnappedActivity(from.kind.clone()));
        }
        if to.link.index() >= self.network.link_count() {
            return Err(RoutingError::UnsnappedActivity(to.kind.clone()));
        }

        let start = self.network.link(from.link).to;
        let end = self.network.link(to.link).from;
        let path = self.calculator.calc_path(self.network, start, end)?;

        Ok(Route {
            links: path.links,
            distance_m: path.distance_m,
            travel_time_s: path.travel_time_s,
        })
    }
}

// ── TeleportationModule ───────────────────────────────────────────────────────

/// Routes a leg as a beeline: distance × detour factor at a fixed speed.
///
/// Used for walk and bike, and as the pt fallback when no transit router
/// is configured.
pub struct TeleportationModule {
    /// Assumed travel speed in metres per second.
    pub speed_mps: f64,
    /// Multiplier turning beeline distance into assumed route distance.
    pub beeline_factor: f64,
}

impl TeleportationModule {
    pub fn new(speed_mps: f64, beeline_factor: f64) -> Self {
        debug_assert!(speed_mps > 0.0, "teleport speed must be positive");
        Self { speed_mps, beeline_factor }
    }
}

impl RoutingModule for TeleportationModule {
    fn route_leg(&mut self, from: &Activity, to: &Activity) -> Result<Route, RoutingError> {
        let distance_m = from.coord.distance_m(to.coord) * self.beeline_factor;
        Ok(Route {
            links: vec![],
            distance_m,
            travel_time_s: distance_m / self.speed_mps,
        })
    }
}

// ── TripRouter ────────────────────────────────────────────────────────────────

/// Dispatches leg routing to the module registered for the leg's mode.
#[derive(Default)]
pub struct TripRouter<'n> {
    modules: HashMap<Mode, Box<dyn RoutingModule + 'n>>,
}

impl<'n> TripRouter<'n> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` for `mode`, replacing any previous registration.
    pub fn with_module(mut self, mode: Mode, module: impl RoutingModule + 'n) -> Self {
        self.modules.insert(mode, Box::new(module));
        self
    }

    pub fn route_leg(
        &mut self,
        mode: Mode,
        from: &Activity,
        to: &Activity,
    ) -> Result<Route, RoutingError> {
        match self.modules.get_mut(&mode) {
            Some(module) => module.route_leg(from, to),
            None => Err(RoutingError::UnroutableMode(mode)),
        }
    }
}
