//! Least-cost path trait and the default Dijkstra implementation.
//!
//! # Cost model
//!
//! Preparation routes under free-flow conditions: the cost of a link is its
//! free-speed traversal time, in integer milliseconds so the heap ordering
//! stays total without float comparisons.  [`Path`] exposes seconds and
//! metres for plan output.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use prep_core::{LinkId, NodeId};

use crate::network::LinkNetwork;
use crate::RoutingError;

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a least-cost path query.
#[derive(Debug, Clone)]
pub struct Path {
    /// Links to traverse in order, from source to destination node.
    pub links: Vec<LinkId>,
    /// Sum of link lengths in metres.
    pub distance_m: f64,
    /// Free-flow travel time in seconds.
    pub travel_time_s: f64,
}

impl Path {
    /// `true` if source and destination were the same node.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── PathCalculator trait ──────────────────────────────────────────────────────

/// Pluggable least-cost path search.
///
/// The network routing module calls path search through this trait so a
/// contraction hierarchy or A* can replace the default Dijkstra without
/// touching the transform.  Implementations take `&mut self`: they may keep
/// per-instance scratch buffers, and each worker owns its own calculator.
pub trait PathCalculator {
    /// Compute the least-cost path from `from` to `to`.
    ///
    /// `from == to` yields an empty path, not an error.
    fn calc_path(
        &mut self,
        network: &LinkNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<Path, RoutingError>;
}

// ── DijkstraPathCalculator ────────────────────────────────────────────────────

/// Standard Dijkstra over the link adjacency under free-speed travel times.
#[derive(Default)]
pub struct DijkstraPathCalculator;

impl PathCalculator for DijkstraPathCalculator {
    fn calc_path(
        &mut self,
        network: &LinkNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<Path, RoutingError> {
        if from == to {
            return Ok(Path { links: vec![], distance_m: 0.0, travel_time_s: 0.0 });
        }

        let n = network.node_count();
        // dist[v] = best known cost (ms) to reach v.
        let mut dist = vec![u64::MAX; n];
        // prev_link[v] = link that reached v; LinkId::INVALID if unreached.
        let mut prev_link = vec![LinkId::INVALID; n];

        dist[from.index()] = 0;

        // Min-heap via Reverse; secondary key NodeId gives deterministic
        // tie-breaking.
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Ok(reconstruct(network, &prev_link, to));
            }

            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            for &link_id in network.out_links(node) {
                let link = network.link(link_id);
                let new_cost = cost.saturating_add(link.travel_time_ms());

                if new_cost < dist[link.to.index()] {
                    dist[link.to.index()] = new_cost;
                    prev_link[link.to.index()] = link_id;
                    heap.push(Reverse((new_cost, link.to)));
                }
            }
        }

        Err(RoutingError::NoRoute { from, to })
    }
}

fn reconstruct(network: &LinkNetwork, prev_link: &[LinkId], to: NodeId) -> Path {
    let mut links = Vec::new();
    let mut cur = to;
    loop {
        let l = prev_link[cur.index()];
        if l == LinkId::INVALID {
            break;
        }
        links.push(l);
        cur = network.link(l).from;
    }
    links.reverse();

    let distance_m: f64 = links.iter().map(|&l| network.link(l).length_m).sum();
    let travel_time_ms: u64 = links.iter().map(|&l| network.link(l).travel_time_ms()).sum();

    Path {
        links,
        distance_m,
        travel_time_s: travel_time_ms as f64 / 1000.0,
    }
}
