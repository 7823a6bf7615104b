//! `prep-population` — the population and facility data model.
//!
//! A population is a flat `Vec<Person>`, each carrying exactly one selected
//! [`Plan`]: an alternating sequence of [`Activity`] and [`Leg`] elements.
//! The preparation transforms (`prep-routing`, `prep-assignment`) mutate
//! plans in place; this crate only defines the shapes and the CSV I/O.
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`plan`]     | `Plan`, `PlanElement`, `Activity`, `Leg`, `Route`      |
//! | [`person`]   | `Person`                                               |
//! | [`facility`] | `Facility`, `FacilityStore`                            |
//! | [`io`]       | CSV load/write for populations and facilities          |
//! | [`error`]    | `PopulationError`, `PopulationResult`                  |

pub mod error;
pub mod facility;
pub mod io;
pub mod person;
pub mod plan;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PopulationError, PopulationResult};
pub use facility::{Facility, FacilityStore};
pub use io::{
    load_facilities_csv, load_facilities_reader, load_population_csv, load_population_reader,
    write_population_csv, write_population_writer,
};
pub use person::Person;
pub use plan::{Activity, Leg, Plan, PlanElement, Route};
