//! `PlanRouterTransform` — the batch transform that routes whole plans.

use prep_batch::{BatchError, BatchResult, Transform};
use prep_core::Mode;
use prep_population::Person;

use crate::modules::{NetworkRoutingModule, TeleportationModule, TripRouter};
use crate::network::LinkNetwork;
use crate::router::DijkstraPathCalculator;
use crate::snap::LinkSnapper;
use crate::RoutingError;

// ── Default teleportation parameters ──────────────────────────────────────────

/// Walk: 3 km/h beeline speed, 1.3 detour factor.
pub const WALK_SPEED_MPS: f64 = 3.0 / 3.6;
/// Bike: 15 km/h beeline speed, 1.3 detour factor.
pub const BIKE_SPEED_MPS: f64 = 15.0 / 3.6;
/// Pt fallback: 25 km/h beeline speed, 1.3 detour factor (no transit
/// schedule is consulted during preparation).
pub const PT_SPEED_MPS: f64 = 25.0 / 3.6;
/// Detour factor applied to all teleported modes.
pub const BEELINE_FACTOR: f64 = 1.3;

// ── PlanRouterTransform ───────────────────────────────────────────────────────

/// Routes every leg of a person's plan and snaps activities to links.
///
/// One instance per worker thread (built by the batch factory); the car
/// network and snapper are shared immutably across workers, the trip router
/// and its path calculator are private per-worker state.
pub struct PlanRouterTransform<'n> {
    snapper: &'n LinkSnapper,
    trip_router: TripRouter<'n>,
}

impl<'n> PlanRouterTransform<'n> {
    /// Build a transform with an explicit trip router.
    pub fn new(snapper: &'n LinkSnapper, trip_router: TripRouter<'n>) -> Self {
        Self { snapper, trip_router }
    }

    /// The standard module set: Dijkstra over the car network for car legs,
    /// teleportation for walk, bike, and pt.
    ///
    /// `car_network` must be the network `snapper` was built from.
    pub fn with_defaults(car_network: &'n LinkNetwork, snapper: &'n LinkSnapper) -> Self {
        let trip_router = TripRouter::new()
            .with_module(
                Mode::Car,
                NetworkRoutingModule::new(car_network, DijkstraPathCalculator),
            )
            .with_module(Mode::Walk, TeleportationModule::new(WALK_SPEED_MPS, BEELINE_FACTOR))
            .with_module(Mode::Bike, TeleportationModule::new(BIKE_SPEED_MPS, BEELINE_FACTOR))
            .with_module(Mode::Pt, TeleportationModule::new(PT_SPEED_MPS, BEELINE_FACTOR));
        Self::new(snapper, trip_router)
    }
}

impl Transform<Person> for PlanRouterTransform<'_> {
    // Routing writes legs directly; there are no sub-results.
    type Output = ();

    fn apply(&mut self, person: &mut Person) -> BatchResult<Vec<()>> {
        if person.plan.is_empty() {
            return Ok(vec![]);
        }

        // ── Snap activities to the car network ────────────────────────────
        for activity in person.plan.activities_mut() {
            let link = self
                .snapper
                .nearest_link(activity.coord)
                .ok_or_else(|| {
                    BatchError::transform(RoutingError::NoLinksToSnap(activity.kind.clone()))
                })?;
            activity.link = link;
        }

        // ── Route every leg ───────────────────────────────────────────────
        //
        // Activities are cloned out before the leg is mutated; plans are a
        // handful of elements, so the copies are noise next to path search.
        for i in 0..person.plan.leg_count() {
            let from = person.plan.activity(i).clone();
            let to = person.plan.activity(i + 1).clone();
            let mode = person.plan.leg(i).mode;

            let route = self
                .trip_router
                .route_leg(mode, &from, &to)
                .map_err(BatchError::transform)?;
            person.plan.leg_mut(i).route = Some(route);
        }

        Ok(vec![])
    }
}
