//! `prep-routing` — the plan-routing transform.
//!
//! Fills in the `route` of every leg of every person's plan:
//!
//! 1. Activity coordinates are snapped to the nearest car link
//!    ([`LinkSnapper`]).
//! 2. Car legs get a least-cost path over the car subnetwork under
//!    free-speed travel times ([`DijkstraPathCalculator`]).
//! 3. Teleported modes (walk, bike, pt) get beeline distance × detour
//!    factor at a fixed mode speed ([`TeleportationModule`]).
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`network`]   | `LinkNetwork`, `NetworkBuilder`, mode filter          |
//! | [`snap`]      | `LinkSnapper` — R-tree nearest-link lookup            |
//! | [`router`]    | `PathCalculator` trait, Dijkstra implementation       |
//! | [`modules`]   | `RoutingModule` trait, network + teleport modules     |
//! | [`transform`] | `PlanRouterTransform` for the batch engine            |
//!
//! Worker threads each build their own [`PlanRouterTransform`] via the
//! batch factory; the network and snapper are shared immutably.

pub mod error;
pub mod modules;
pub mod network;
pub mod router;
pub mod snap;
pub mod transform;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RoutingError, RoutingResult};
pub use modules::{NetworkRoutingModule, RoutingModule, TeleportationModule, TripRouter};
pub use network::{Link, LinkNetwork, NetworkBuilder};
pub use router::{DijkstraPathCalculator, Path, PathCalculator};
pub use snap::LinkSnapper;
pub use transform::PlanRouterTransform;
