//! CSV population and facility I/O.
//!
//! # Population format
//!
//! One row per plan element, rows grouped by person and in plan order:
//!
//! ```csv
//! person_id,element,kind,x,y,end_time,distance_m,travel_time_s
//! 0,activity,home,2679000.0,1247000.0,08:00:00,,
//! 0,leg,car,,,,,
//! 0,activity,work,2683000.0,1248500.0,17:00:00,,
//! ```
//!
//! `element` is `activity` or `leg`.  For activities, `kind` is the activity
//! purpose and `x`/`y`/`end_time` apply (`end_time` empty = open-ended).
//! For legs, `kind` is the mode; `distance_m` and `travel_time_s` are
//! populated on write for routed legs and accepted on read (link sequences
//! are not round-tripped — a re-read population must be re-routed if link
//! routes are needed).
//!
//! Person IDs must be dense (`0..n`); persons without rows get an empty
//! plan.
//!
//! # Facility format
//!
//! ```csv
//! facility_id,x,y,kinds
//! 0,2679100.0,1247050.0,leisure|shop
//! ```
//!
//! `kinds` is `|`-separated.  Facility IDs must be dense.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use prep_core::{Coord, FacilityId, Mode, PersonId};
use prep_core::time::{parse_time, write_time};

use crate::facility::{Facility, FacilityStore};
use crate::plan::{Activity, Leg, Plan, PlanElement, Route};
use crate::{Person, PopulationError};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct PlanRow {
    person_id:     u32,
    element:       String,
    kind:          String,
    x:             Option<f64>,
    y:             Option<f64>,
    end_time:      Option<String>,
    distance_m:    Option<f64>,
    travel_time_s: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct FacilityRow {
    facility_id: u32,
    x:           f64,
    y:           f64,
    kinds:       String,
}

// ── Population loading ────────────────────────────────────────────────────────

/// Load a population from a CSV file.
pub fn load_population_csv(path: &Path) -> Result<Vec<Person>, PopulationError> {
    let file = std::fs::File::open(path).map_err(PopulationError::Io)?;
    load_population_reader(file)
}

/// Like [`load_population_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from streams.
pub fn load_population_reader<R: Read>(reader: R) -> Result<Vec<Person>, PopulationError> {
    // ── Parse CSV rows, grouped by person ─────────────────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_person: HashMap<u32, Vec<PlanRow>> = HashMap::new();
    let mut max_id: Option<u32> = None;

    for result in csv_reader.deserialize::<PlanRow>() {
        let row = result.map_err(|e| PopulationError::Parse(e.to_string()))?;
        max_id = Some(max_id.map_or(row.person_id, |m| m.max(row.person_id)));
        by_person.entry(row.person_id).or_default().push(row);
    }

    let count = max_id.map_or(0, |m| m as usize + 1);

    // ── Build one Person per dense ID ─────────────────────────────────────
    let mut persons = Vec::with_capacity(count);
    for i in 0..count as u32 {
        let plan = match by_person.remove(&i) {
            None => Plan::empty(),
            Some(rows) => build_plan(i, rows)?,
        };
        persons.push(Person::new(PersonId(i), plan));
    }

    Ok(persons)
}

fn build_plan(person_id: u32, rows: Vec<PlanRow>) -> Result<Plan, PopulationError> {
    let mut elements = Vec::with_capacity(rows.len());

    for row in rows {
        match row.element.as_str() {
            "activity" => {
                let (x, y) = match (row.x, row.y) {
                    (Some(x), Some(y)) => (x, y),
                    _ => {
                        return Err(PopulationError::Parse(format!(
                            "person {person_id}: activity row without coordinates"
                        )));
                    }
                };
                let mut activity = Activity::new(row.kind, Coord::new(x, y));
                activity.end_time = match row.end_time.as_deref() {
                    None | Some("") | Some("undefined") => None,
                    Some(t) => Some(parse_time(t).ok_or_else(|| {
                        PopulationError::Parse(format!(
                            "person {person_id}: invalid end_time {t:?}"
                        ))
                    })?),
                };
                elements.push(PlanElement::Activity(activity));
            }
            "leg" => {
                let mode: Mode = row
                    .kind
                    .parse()
                    .map_err(|e| PopulationError::Parse(format!("person {person_id}: {e}")))?;
                let mut leg = Leg::new(mode);
                if let (Some(distance_m), Some(travel_time_s)) =
                    (row.distance_m, row.travel_time_s)
                {
                    leg.route = Some(Route { links: vec![], distance_m, travel_time_s });
                }
                elements.push(PlanElement::Leg(leg));
            }
            other => {
                return Err(PopulationError::Parse(format!(
                    "person {person_id}: unknown element {other:?}: expected activity or leg"
                )));
            }
        }
    }

    Plan::new(elements)
}

// ── Population writing ────────────────────────────────────────────────────────

/// Write a population to a CSV file (creating or truncating it).
pub fn write_population_csv(path: &Path, persons: &[Person]) -> Result<(), PopulationError> {
    let file = std::fs::File::create(path).map_err(PopulationError::Io)?;
    write_population_writer(file, persons)
}

/// Like [`write_population_csv`] but accepts any `Write` sink.
pub fn write_population_writer<W: Write>(
    writer: W,
    persons: &[Person],
) -> Result<(), PopulationError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for person in persons {
        for element in person.plan.elements() {
            let row = match element {
                PlanElement::Activity(a) => PlanRow {
                    person_id:     person.id.0,
                    element:       "activity".to_string(),
                    kind:          a.kind.clone(),
                    x:             Some(a.coord.x),
                    y:             Some(a.coord.y),
                    end_time:      a.end_time.map(write_time),
                    distance_m:    None,
                    travel_time_s: None,
                },
                PlanElement::Leg(l) => PlanRow {
                    person_id:     person.id.0,
                    element:       "leg".to_string(),
                    kind:          l.mode.name().to_string(),
                    x:             None,
                    y:             None,
                    end_time:      None,
                    distance_m:    l.route.as_ref().map(|r| r.distance_m),
                    travel_time_s: l.route.as_ref().map(|r| r.travel_time_s),
                },
            };
            csv_writer
                .serialize(row)
                .map_err(|e| PopulationError::Parse(e.to_string()))?;
        }
    }

    csv_writer
        .flush()
        .map_err(PopulationError::Io)
}

// ── Facility loading ──────────────────────────────────────────────────────────

/// Load facilities from a CSV file.
pub fn load_facilities_csv(path: &Path) -> Result<FacilityStore, PopulationError> {
    let file = std::fs::File::open(path).map_err(PopulationError::Io)?;
    load_facilities_reader(file)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
pub fn load_facilities_reader<R: Read>(reader: R) -> Result<FacilityStore, PopulationError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut facilities = Vec::new();

    for result in csv_reader.deserialize::<FacilityRow>() {
        let row = result.map_err(|e| PopulationError::Parse(e.to_string()))?;
        if row.facility_id as usize != facilities.len() {
            return Err(PopulationError::Parse(format!(
                "facility IDs must be dense and ascending: expected {}, got {}",
                facilities.len(),
                row.facility_id
            )));
        }
        facilities.push(Facility {
            id:    FacilityId(row.facility_id),
            coord: Coord::new(row.x, row.y),
            kinds: row
                .kinds
                .split('|')
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }

    Ok(FacilityStore::new(facilities))
}
