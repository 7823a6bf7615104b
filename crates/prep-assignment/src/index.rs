//! `FacilityIndex` — per-kind spatial candidate lookup.
//!
//! One R-tree per variable activity kind.  The solver asks for the facility
//! whose distance from a center best matches a sampled target; the ascending
//! nearest-neighbor iterator lets the search stop as soon as no closer match
//! can follow.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use prep_core::{Coord, FacilityId};
use prep_population::FacilityStore;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct FacilityEntry {
    point: [f64; 2],
    id: FacilityId,
}

impl RTreeObject for FacilityEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for FacilityEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── FacilityIndex ─────────────────────────────────────────────────────────────

/// Immutable per-kind spatial indexes over the facility store.
///
/// Build once per run (bulk-load) and share across worker threads; lookups
/// take `&self`.
pub struct FacilityIndex {
    by_kind: FxHashMap<String, RTree<FacilityEntry>>,
}

impl FacilityIndex {
    /// Index the facilities offering each of `kinds`.  A facility offering
    /// several kinds appears in several trees.
    pub fn new(store: &FacilityStore, kinds: &[&str]) -> Self {
        let mut by_kind = FxHashMap::default();
        for &kind in kinds {
            let entries: Vec<FacilityEntry> = store
                .iter()
                .filter(|f| f.offers(kind))
                .map(|f| FacilityEntry { point: [f.coord.x, f.coord.y], id: f.id })
                .collect();
            by_kind.insert(kind.to_string(), RTree::bulk_load(entries));
        }
        Self { by_kind }
    }

    /// Number of facilities indexed under `kind` (0 for unknown kinds).
    pub fn candidate_count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, RTree::size)
    }

    /// The facility of `kind` whose distance from `center` is closest to
    /// `target_dist` metres, or `None` if no facility offers the kind.
    ///
    /// Candidates arrive in ascending distance order, so once a candidate's
    /// distance exceeds `target_dist` by more than the best deviation seen,
    /// none that follow can improve on it.
    pub fn best_match(
        &self,
        kind: &str,
        center: Coord,
        target_dist: f64,
    ) -> Option<(FacilityId, Coord)> {
        let tree = self.by_kind.get(kind)?;

        let mut best: Option<(FacilityId, Coord)> = None;
        let mut best_dev = f64::INFINITY;
        for entry in tree.nearest_neighbor_iter(&[center.x, center.y]) {
            let dist = entry.distance_2(&[center.x, center.y]).sqrt();
            if dist - target_dist > best_dev {
                break;
            }
            let dev = (dist - target_dist).abs();
            if dev < best_dev {
                best_dev = dev;
                best = Some((entry.id, Coord::new(entry.point[0], entry.point[1])));
            }
        }
        best
    }
}
