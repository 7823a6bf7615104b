//! Link network representation, builder, and mode filter.
//!
//! # Data layout
//!
//! Nodes are coordinates; links are directed, carry length, free speed, and
//! the set of modes allowed on them.  Outgoing links per node are held in a
//! plain adjacency list — preparation routes each leg once, so the layout
//! favours simplicity over the last bit of cache locality.
//!
//! # Mode filtering
//!
//! Car routing and activity snapping both run on the car subnetwork
//! obtained from [`LinkNetwork::mode_subnetwork`].  The filter keeps all
//! nodes (node IDs stay valid across network and subnetwork) but re-indexes
//! links densely, so a `LinkId` is only meaningful relative to the network
//! it came from.

use prep_core::{Coord, LinkId, Mode, NodeId};

// ── Link ──────────────────────────────────────────────────────────────────────

/// A directed network link.
#[derive(Clone, Debug)]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in metres.
    pub length_m: f64,
    /// Free-flow speed in metres per second.
    pub freespeed_mps: f64,
    /// Modes allowed on this link.
    pub modes: Vec<Mode>,
}

impl Link {
    /// Free-flow traversal time in milliseconds (ceiling — a vehicle is
    /// never early).  Integer costs keep Dijkstra's ordering total.
    #[inline]
    pub fn travel_time_ms(&self) -> u64 {
        (self.length_m / self.freespeed_mps * 1000.0).ceil() as u64
    }

    pub fn allows(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }
}

// ── LinkNetwork ───────────────────────────────────────────────────────────────

/// Directed link graph.  Construct via [`NetworkBuilder`].
#[derive(Clone, Debug, Default)]
pub struct LinkNetwork {
    node_coords: Vec<Coord>,
    links: Vec<Link>,
    /// Outgoing link IDs per node, indexed by `NodeId`.
    out_links: Vec<Vec<LinkId>>,
}

impl LinkNetwork {
    /// A network with no nodes or links.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.node_coords.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_coord(&self, node: NodeId) -> Coord {
        self.node_coords[node.index()]
    }

    pub fn link(&self, link: LinkId) -> &Link {
        &self.links[link.index()]
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Outgoing links of `node`.
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        &self.out_links[node.index()]
    }

    /// Extract the subnetwork of links allowing `mode`.
    ///
    /// Node IDs are preserved; link IDs are re-indexed densely within the
    /// subnetwork.
    pub fn mode_subnetwork(&self, mode: Mode) -> LinkNetwork {
        let mut out_links = vec![Vec::new(); self.node_coords.len()];
        let mut links = Vec::new();

        for link in &self.links {
            if !link.allows(mode) {
                continue;
            }
            let id = LinkId(links.len() as u32);
            out_links[link.from.index()].push(id);
            links.push(Link { id, ..link.clone() });
        }

        LinkNetwork {
            node_coords: self.node_coords.clone(),
            links,
            out_links,
        }
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Incremental construction of a [`LinkNetwork`].
#[derive(Default)]
pub struct NetworkBuilder {
    node_coords: Vec<Coord>,
    links: Vec<Link>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        let id = NodeId(self.node_coords.len() as u32);
        self.node_coords.push(coord);
        id
    }

    /// Add a directed link.  Length is taken from the node coordinates;
    /// use [`add_link_with_length`][Self::add_link_with_length] when the
    /// physical length differs from the beeline.
    pub fn add_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        freespeed_mps: f64,
        modes: &[Mode],
    ) -> LinkId {
        let length_m = self.node_coords[from.index()].distance_m(self.node_coords[to.index()]);
        self.add_link_with_length(from, to, length_m, freespeed_mps, modes)
    }

    pub fn add_link_with_length(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        freespeed_mps: f64,
        modes: &[Mode],
    ) -> LinkId {
        debug_assert!(freespeed_mps > 0.0, "freespeed must be positive");
        debug_assert!(
            from.index() < self.node_coords.len() && to.index() < self.node_coords.len(),
            "link endpoints must be added before the link"
        );
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link {
            id,
            from,
            to,
            length_m,
            freespeed_mps,
            modes: modes.to_vec(),
        });
        id
    }

    pub fn build(self) -> LinkNetwork {
        let mut out_links = vec![Vec::new(); self.node_coords.len()];
        for link in &self.links {
            out_links[link.from.index()].push(link.id);
        }
        LinkNetwork {
            node_coords: self.node_coords,
            links: self.links,
            out_links,
        }
    }
}
