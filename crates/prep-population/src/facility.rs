//! Activity facilities.

use prep_core::{Coord, FacilityId};

/// A place where activities can happen (shop, restaurant, office, …).
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub coord: Coord,
    /// Activity kinds offered at this facility (e.g. `["leisure", "shop"]`).
    pub kinds: Vec<String>,
}

impl Facility {
    pub fn offers(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }
}

/// Dense facility storage, indexed by `FacilityId`.
#[derive(Clone, Debug, Default)]
pub struct FacilityStore {
    facilities: Vec<Facility>,
}

impl FacilityStore {
    /// Build a store from facilities whose IDs match their position.
    ///
    /// # Panics
    /// Panics in debug mode if any facility's ID disagrees with its index.
    pub fn new(facilities: Vec<Facility>) -> Self {
        debug_assert!(
            facilities.iter().enumerate().all(|(i, f)| f.id.index() == i),
            "facility IDs must be dense and match their index"
        );
        Self { facilities }
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter()
    }
}
