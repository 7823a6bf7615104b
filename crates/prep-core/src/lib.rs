//! `prep-core` — foundational types for the `rust_prep` preparation pipeline.
//!
//! This crate is a dependency of every other `prep-*` crate.  It has no
//! `prep-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `PersonId`, `NodeId`, `LinkId`, `FacilityId`          |
//! | [`geo`]       | `Coord`, planar Euclidean distance                    |
//! | [`time`]      | `write_time` hh:mm:ss formatting                      |
//! | [`transport`] | `Mode` enum                                           |
//! | [`error`]     | `PrepError`, `PrepResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PrepError, PrepResult};
pub use geo::Coord;
pub use ids::{FacilityId, LinkId, NodeId, PersonId};
pub use time::write_time;
pub use transport::Mode;
