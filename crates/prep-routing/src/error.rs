//! Routing error type.

use prep_core::{Mode, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    /// The graph has no path between the two nodes.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    /// No routing module registered for the leg's mode.
    #[error("no routing module for mode {0}")]
    UnroutableMode(Mode),

    /// An activity could not be snapped (empty network).
    #[error("cannot snap activity {0:?}: network has no links")]
    NoLinksToSnap(String),

    /// An activity reached the network router without a snapped link.
    #[error("activity {0:?} has no link; snapping must run before routing")]
    UnsnappedActivity(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
