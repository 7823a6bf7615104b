//! Integration tests for prep-routing.

use prep_core::{Coord, LinkId, Mode, NodeId, PersonId};
use prep_population::{Activity, Leg, Person, Plan, PlanElement};

use crate::modules::{RoutingModule, TeleportationModule, TripRouter};
use crate::network::{LinkNetwork, NetworkBuilder};
use crate::router::{DijkstraPathCalculator, PathCalculator};
use crate::snap::LinkSnapper;
use crate::transform::PlanRouterTransform;
use crate::RoutingError;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 4 nodes in a line, 1 km apart, bidirectional car+bike links at 10 m/s:
/// 0 ↔ 1 ↔ 2 ↔ 3.
fn line_network() -> LinkNetwork {
    let mut b = NetworkBuilder::new();
    let nodes: Vec<NodeId> = (0..4)
        .map(|i| b.add_node(Coord::new(i as f64 * 1_000.0, 0.0)))
        .collect();
    for w in nodes.windows(2) {
        b.add_link(w[0], w[1], 10.0, &[Mode::Car, Mode::Bike]);
        b.add_link(w[1], w[0], 10.0, &[Mode::Car, Mode::Bike]);
    }
    b.build()
}

fn activity_at(kind: &str, coord: Coord) -> Activity {
    Activity::new(kind, coord)
}

fn home_work_plan(home: Coord, work: Coord, mode: Mode) -> Plan {
    Plan::new(vec![
        PlanElement::Activity(activity_at("home", home)),
        PlanElement::Leg(Leg::new(mode)),
        PlanElement::Activity(activity_at("work", work)),
    ])
    .unwrap()
}

// ── Network and filter ────────────────────────────────────────────────────────

mod network_tests {
    use super::*;

    #[test]
    fn builder_derives_length_from_coords() {
        let net = line_network();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.link_count(), 6);
        assert_eq!(net.link(LinkId(0)).length_m, 1_000.0);
        // 1000 m at 10 m/s = 100 s.
        assert_eq!(net.link(LinkId(0)).travel_time_ms(), 100_000);
    }

    #[test]
    fn mode_subnetwork_filters_and_reindexes() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(100.0, 0.0));
        b.add_link(n0, n1, 10.0, &[Mode::Car]);
        b.add_link(n1, n0, 10.0, &[Mode::Walk]);
        let net = b.build();

        let car = net.mode_subnetwork(Mode::Car);
        // Nodes preserved, walk-only link dropped, links dense again.
        assert_eq!(car.node_count(), 2);
        assert_eq!(car.link_count(), 1);
        assert_eq!(car.link(LinkId(0)).from, n0);
        assert_eq!(car.out_links(n1), &[] as &[LinkId]);
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

mod router_tests {
    use super::*;

    #[test]
    fn shortest_path_along_line() {
        let net = line_network();
        let path = DijkstraPathCalculator
            .calc_path(&net, NodeId(0), NodeId(3))
            .unwrap();
        assert_eq!(path.links.len(), 3);
        assert_eq!(path.distance_m, 3_000.0);
        assert_eq!(path.travel_time_s, 300.0);
    }

    #[test]
    fn same_node_yields_trivial_path() {
        let net = line_network();
        let path = DijkstraPathCalculator
            .calc_path(&net, NodeId(2), NodeId(2))
            .unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.travel_time_s, 0.0);
    }

    #[test]
    fn disconnected_nodes_error() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(100.0, 0.0));
        // No links at all.
        let net = b.build();
        let result = DijkstraPathCalculator.calc_path(&net, n0, n1);
        assert!(matches!(result, Err(RoutingError::NoRoute { .. })));
    }

    #[test]
    fn prefers_faster_detour_over_slow_direct() {
        // Direct link 0→1 at 1 m/s (1000 s) vs detour 0→2→1 at 50 m/s
        // (2000 m / 50 = 40 s).
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(1_000.0, 0.0));
        let n2 = b.add_node(Coord::new(500.0, 500.0));
        b.add_link_with_length(n0, n1, 1_000.0, 1.0, &[Mode::Car]);
        b.add_link_with_length(n0, n2, 1_000.0, 50.0, &[Mode::Car]);
        b.add_link_with_length(n2, n1, 1_000.0, 50.0, &[Mode::Car]);
        let net = b.build();

        let path = DijkstraPathCalculator.calc_path(&net, n0, n1).unwrap();
        assert_eq!(path.links.len(), 2, "should take the fast detour");
        assert_eq!(path.travel_time_s, 40.0);
    }
}

// ── Snapping ──────────────────────────────────────────────────────────────────

mod snap_tests {
    use super::*;

    #[test]
    fn nearest_link_by_midpoint() {
        let net = line_network();
        let snapper = LinkSnapper::new(&net);
        // Point near the midpoint of link 0 (0 → 1, midpoint x = 500).
        let hit = snapper.nearest_link(Coord::new(480.0, 10.0)).unwrap();
        assert_eq!(net.link(hit).from.index().min(net.link(hit).to.index()), 0);
    }

    #[test]
    fn empty_network_snaps_to_none() {
        let snapper = LinkSnapper::new(&LinkNetwork::empty());
        assert!(snapper.nearest_link(Coord::new(0.0, 0.0)).is_none());
    }
}

// ── Modules ───────────────────────────────────────────────────────────────────

mod module_tests {
    use super::*;

    #[test]
    fn teleportation_applies_factor_and_speed() {
        let from = activity_at("home", Coord::new(0.0, 0.0));
        let to = activity_at("shop", Coord::new(1_000.0, 0.0));
        let mut module = TeleportationModule::new(2.0, 1.3);
        let route = module.route_leg(&from, &to).unwrap();
        assert_eq!(route.distance_m, 1_300.0);
        assert_eq!(route.travel_time_s, 650.0);
        assert!(route.links.is_empty());
    }

    #[test]
    fn trip_router_unknown_mode_errors() {
        let from = activity_at("home", Coord::new(0.0, 0.0));
        let to = activity_at("work", Coord::new(100.0, 0.0));
        let mut router =
            TripRouter::new().with_module(Mode::Walk, TeleportationModule::new(1.0, 1.0));
        let result = router.route_leg(Mode::Car, &from, &to);
        assert!(matches!(result, Err(RoutingError::UnroutableMode(Mode::Car))));
    }
}

// ── Plan transform ────────────────────────────────────────────────────────────

mod transform_tests {
    use super::*;
    use prep_batch::Transform;

    #[test]
    fn routes_car_plan_and_snaps_activities() {
        let net = line_network();
        let car = net.mode_subnetwork(Mode::Car);
        let snapper = LinkSnapper::new(&car);

        let mut person = Person::new(
            PersonId(0),
            home_work_plan(Coord::new(10.0, 0.0), Coord::new(2_990.0, 0.0), Mode::Car),
        );

        let mut transform = PlanRouterTransform::with_defaults(&car, &snapper);
        let outputs = transform.apply(&mut person).unwrap();
        assert!(outputs.is_empty(), "routing has no sub-results");

        // Activities snapped.
        assert_ne!(person.plan.activity(0).link, LinkId::INVALID);
        assert_ne!(person.plan.activity(1).link, LinkId::INVALID);

        // Leg routed with positive network travel time.
        let route = person.plan.leg(0).route.as_ref().unwrap();
        assert!(route.travel_time_s > 0.0);
        assert!(!route.links.is_empty());
    }

    #[test]
    fn teleported_leg_has_no_links() {
        let net = line_network();
        let car = net.mode_subnetwork(Mode::Car);
        let snapper = LinkSnapper::new(&car);

        let mut person = Person::new(
            PersonId(0),
            home_work_plan(Coord::new(0.0, 0.0), Coord::new(1_000.0, 0.0), Mode::Walk),
        );

        let mut transform = PlanRouterTransform::with_defaults(&car, &snapper);
        transform.apply(&mut person).unwrap();

        let route = person.plan.leg(0).route.as_ref().unwrap();
        assert!(route.links.is_empty());
        assert_eq!(route.distance_m, 1_300.0); // 1 km beeline × 1.3
    }

    #[test]
    fn empty_plan_is_skipped() {
        let net = line_network();
        let car = net.mode_subnetwork(Mode::Car);
        let snapper = LinkSnapper::new(&car);

        let mut person = Person::new(PersonId(0), Plan::empty());
        let mut transform = PlanRouterTransform::with_defaults(&car, &snapper);
        assert!(transform.apply(&mut person).is_ok());
    }

    #[test]
    fn batch_run_routes_whole_population() {
        use prep_batch::{run_batch_with, BatchConfig, CancelToken};
        use std::time::Duration;

        let net = line_network();
        let car = net.mode_subnetwork(Mode::Car);
        let snapper = LinkSnapper::new(&car);

        let mut persons: Vec<Person> = (0..200)
            .map(|i| {
                Person::new(
                    PersonId(i),
                    home_work_plan(
                        Coord::new(10.0, 0.0),
                        Coord::new(2_990.0, 0.0),
                        if i % 2 == 0 { Mode::Car } else { Mode::Bike },
                    ),
                )
            })
            .collect();

        let config = BatchConfig::new("Routing", 4)
            .chunk_size(16)
            .report_interval(Duration::from_millis(1));
        run_batch_with(
            &mut persons,
            || PlanRouterTransform::with_defaults(&car, &snapper),
            &config,
            std::io::sink(),
            &CancelToken::new(),
        )
        .unwrap();

        assert!(persons.iter().all(|p| p.plan.leg(0).route.is_some()));
    }
}
