//! `LinkSnapper` — nearest-link lookup for activity coordinates.
//!
//! The original preparation attaches every activity to the closest car link
//! before routing (so trips start and end on the network).  An R-tree over
//! link midpoints makes the lookup O(log n); midpoints are a sufficient
//! proxy for whole-segment distance at urban link lengths.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use prep_core::{Coord, LinkId};

use crate::network::LinkNetwork;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a link midpoint with its `LinkId`.
#[derive(Clone)]
struct LinkEntry {
    point: [f64; 2],
    id: LinkId,
}

impl RTreeObject for LinkEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LinkEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── LinkSnapper ───────────────────────────────────────────────────────────────

/// Immutable spatial index over a network's links.
///
/// Build once per run (bulk-load) and share across worker threads; lookups
/// take `&self`.
pub struct LinkSnapper {
    index: RTree<LinkEntry>,
}

impl LinkSnapper {
    pub fn new(network: &LinkNetwork) -> Self {
        let entries: Vec<LinkEntry> = network
            .links()
            .iter()
            .map(|link| {
                let mid = network
                    .node_coord(link.from)
                    .midpoint(network.node_coord(link.to));
                LinkEntry { point: [mid.x, mid.y], id: link.id }
            })
            .collect();
        Self { index: RTree::bulk_load(entries) }
    }

    /// The link whose midpoint is closest to `coord`, or `None` for an
    /// empty network.
    pub fn nearest_link(&self, coord: Coord) -> Option<LinkId> {
        self.index
            .nearest_neighbor(&[coord.x, coord.y])
            .map(|entry| entry.id)
    }
}
