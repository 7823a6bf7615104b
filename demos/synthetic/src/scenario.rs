//! Synthetic scenario generation: a grid road network, scattered
//! facilities, and a population with fixed anchors and variable
//! secondary activities.

use rand::rngs::SmallRng;
use rand::Rng;

use prep_core::{Coord, FacilityId, Mode, PersonId};
use prep_population::{Activity, Facility, FacilityStore, Leg, Person, Plan, PlanElement};
use prep_routing::{LinkNetwork, NetworkBuilder};

/// Grid size in nodes per side.
pub const GRID_SIDE: usize = 6;
/// Node spacing in metres.
pub const GRID_SPACING_M: f64 = 500.0;
/// Urban car freespeed, 50 km/h.
const CAR_FREESPEED_MPS: f64 = 50.0 / 3.6;

/// Extent of the scenario in metres (square, starting at the origin).
pub fn extent_m() -> f64 {
    (GRID_SIDE - 1) as f64 * GRID_SPACING_M
}

/// A `GRID_SIDE` × `GRID_SIDE` grid with bidirectional car+bike links
/// between orthogonal neighbors.
pub fn build_network() -> LinkNetwork {
    let mut b = NetworkBuilder::new();
    let nodes: Vec<_> = (0..GRID_SIDE * GRID_SIDE)
        .map(|i| {
            let (row, col) = (i / GRID_SIDE, i % GRID_SIDE);
            b.add_node(Coord::new(
                col as f64 * GRID_SPACING_M,
                row as f64 * GRID_SPACING_M,
            ))
        })
        .collect();

    let modes = [Mode::Car, Mode::Bike];
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = nodes[row * GRID_SIDE + col];
            if col + 1 < GRID_SIDE {
                let east = nodes[row * GRID_SIDE + col + 1];
                b.add_link(here, east, CAR_FREESPEED_MPS, &modes);
                b.add_link(east, here, CAR_FREESPEED_MPS, &modes);
            }
            if row + 1 < GRID_SIDE {
                let north = nodes[(row + 1) * GRID_SIDE + col];
                b.add_link(here, north, CAR_FREESPEED_MPS, &modes);
                b.add_link(north, here, CAR_FREESPEED_MPS, &modes);
            }
        }
    }
    b.build()
}

/// `count` facilities at uniform random positions, cycling through kind
/// combinations so every variable kind is well represented.
pub fn build_facilities(count: usize, rng: &mut SmallRng) -> FacilityStore {
    const KIND_SETS: [&[&str]; 4] = [
        &["shop"],
        &["leisure"],
        &["service"],
        &["shop", "leisure"],
    ];

    let extent = extent_m();
    let facilities = (0..count)
        .map(|i| Facility {
            id: FacilityId(i as u32),
            coord: Coord::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)),
            kinds: KIND_SETS[i % KIND_SETS.len()]
                .iter()
                .map(|&k| k.to_string())
                .collect(),
        })
        .collect();
    FacilityStore::new(facilities)
}

/// `count` persons with random home and work locations.
///
/// Even persons run a full day with a shopping stop on the way to work and
/// an evening leisure trip; odd persons commute directly.  Variable
/// activities start at the home coordinate as a placeholder until location
/// assignment relocates them.
pub fn build_population(count: usize, rng: &mut SmallRng) -> Vec<Person> {
    let extent = extent_m();
    let random_coord =
        |rng: &mut SmallRng| Coord::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));

    (0..count)
        .map(|i| {
            let home = random_coord(rng);
            let work = random_coord(rng);

            let elements = if i % 2 == 0 {
                vec![
                    PlanElement::Activity(Activity::new("home", home).with_end_time(7.5 * 3_600.0)),
                    PlanElement::Leg(Leg::new(Mode::Walk)),
                    PlanElement::Activity(Activity::new("shop", home).with_end_time(8.0 * 3_600.0)),
                    PlanElement::Leg(Leg::new(Mode::Walk)),
                    PlanElement::Activity(Activity::new("work", work).with_end_time(17.0 * 3_600.0)),
                    PlanElement::Leg(Leg::new(Mode::Car)),
                    PlanElement::Activity(
                        Activity::new("leisure", work).with_end_time(20.0 * 3_600.0),
                    ),
                    PlanElement::Leg(Leg::new(Mode::Car)),
                    PlanElement::Activity(Activity::new("home", home)),
                ]
            } else {
                vec![
                    PlanElement::Activity(Activity::new("home", home).with_end_time(8.0 * 3_600.0)),
                    PlanElement::Leg(Leg::new(Mode::Car)),
                    PlanElement::Activity(Activity::new("work", work).with_end_time(17.5 * 3_600.0)),
                    PlanElement::Leg(Leg::new(Mode::Car)),
                    PlanElement::Activity(Activity::new("home", home)),
                ]
            };

            // The element sequences above alternate correctly.
            let plan = Plan::new(elements).expect("generated plan is well-formed");
            Person::new(PersonId(i as u32), plan)
        })
        .collect()
}
