//! synthetic — smallest end-to-end run of the rust_prep pipeline.
//!
//! Generates a 6×6 grid city with 500 persons and 48 facilities, assigns
//! locations to the variable activities (shop, leisure), routes every
//! plan, and writes the finished population CSV.  Swap the generated
//! scenario for real survey and OSM inputs to run at regional scale.

mod scenario;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use prep_assignment::{AssignmentTransform, EmpiricalDistances, FacilityIndex, SolverConfig};
use prep_batch::{run_batch, BatchConfig};
use prep_core::Mode;
use prep_population::write_population_csv;
use prep_routing::{LinkSnapper, PlanRouterTransform};

// ── Constants ─────────────────────────────────────────────────────────────────

const PERSON_COUNT:   usize = 500;
const FACILITY_COUNT: usize = 48;
const SEED:           u64   = 42;
const THREADS:        usize = 4;

// ── Distance distributions ────────────────────────────────────────────────────

// Quantile tables roughly shaped like urban trip-distance surveys, scaled
// to the 2.5 km grid extent.
const DISTANCES_CSV: &str = "\
mode,quantile,distance_m
walk,0.0,50.0
walk,0.5,400.0
walk,1.0,1200.0
bike,0.0,200.0
bike,0.5,900.0
bike,1.0,2500.0
car,0.0,300.0
car,0.5,1200.0
car,1.0,3000.0
pt,0.0,400.0
pt,0.5,1500.0
pt,1.0,3000.0
";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== synthetic — rust_prep pipeline ===");
    println!("Persons: {PERSON_COUNT}  |  Facilities: {FACILITY_COUNT}  |  Seed: {SEED}");
    println!();

    let mut rng = SmallRng::seed_from_u64(SEED);

    // 1. Build the road network and its car subnetwork.
    let network = scenario::build_network();
    let car_network = network.mode_subnetwork(Mode::Car);
    println!(
        "Road network: {} nodes, {} links ({} car links)",
        network.node_count(),
        network.link_count(),
        car_network.link_count()
    );

    // 2. Generate facilities and index them per activity kind.
    let facilities = scenario::build_facilities(FACILITY_COUNT, &mut rng);
    let index = FacilityIndex::new(&facilities, &["leisure", "shop", "service"]);
    println!("Facilities: {} ({} offer shopping)", facilities.len(), index.candidate_count("shop"));

    // 3. Generate the population.
    let mut persons = scenario::build_population(PERSON_COUNT, &mut rng);
    let trips: usize = persons.iter().map(|p| p.plan.leg_count()).sum();
    println!("Population: {} persons, {} trips", persons.len(), trips);
    println!();

    // 4. Location assignment: relocate shop and leisure activities.
    let distances: EmpiricalDistances =
        prep_assignment::load_distances_reader(DISTANCES_CSV.as_bytes())?;
    let t0 = Instant::now();
    let next_seed = AtomicU64::new(SEED);
    run_batch(
        &mut persons,
        || {
            let seed = next_seed.fetch_add(1, Ordering::Relaxed);
            AssignmentTransform::new(&index, &distances, SolverConfig::default(), seed)
        },
        &BatchConfig::new("Location assignment", THREADS)
            .chunk_size(64)
            .report_interval(Duration::from_millis(200)),
    )?;
    println!("Location assignment done in {:.3} s", t0.elapsed().as_secs_f64());

    // 5. Routing: snap activities to links and route every leg.
    let snapper = LinkSnapper::new(&car_network);
    let t0 = Instant::now();
    run_batch(
        &mut persons,
        || PlanRouterTransform::with_defaults(&car_network, &snapper),
        &BatchConfig::new("Routing", THREADS)
            .chunk_size(64)
            .report_interval(Duration::from_millis(200)),
    )?;
    println!("Routing done in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 6. Write the finished population.
    std::fs::create_dir_all("output/synthetic")?;
    let out_path = Path::new("output/synthetic/population.csv");
    write_population_csv(out_path, &persons)?;
    println!("Wrote {}", out_path.display());
    println!();

    // 7. Summary: first few persons' trips.
    println!("{:<8} {:<6} {:<6} {:>10} {:>10}", "Person", "Leg", "Mode", "Dist [m]", "Time [s]");
    println!("{}", "-".repeat(44));
    for person in persons.iter().take(3) {
        for (i, leg) in person.plan.legs().enumerate() {
            let route = leg.route.as_ref().expect("all legs routed");
            println!(
                "{:<8} {:<6} {:<6} {:>10.0} {:>10.0}",
                person.id.0,
                i,
                leg.mode.name(),
                route.distance_m,
                route.travel_time_s
            );
        }
    }

    Ok(())
}
