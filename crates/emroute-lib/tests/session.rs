mod common;

use emroute_lib::{
    EmergencySession, EngineConfig, Error, GeoPoint, RouteAlgorithm, RouteRenderMode,
    RouteSummary,
};

use common::fixtures_dir;

fn session() -> EmergencySession {
    let mut session: EmergencySession = EmergencySession::default();
    session
        .load_path(&fixtures_dir().join("downtown_grid.json"))
        .expect("fixture loads");
    session
}

// Clicks just off the south-west and north-east corners of the grid.
const ORIGIN: GeoPoint = GeoPoint::new(-0.18005, -78.48005);
const DESTINATION: GeoPoint = GeoPoint::new(-0.17695, -78.47695);

#[test]
fn trip_counts_both_walking_legs() {
    let mut session = session();
    let plan = session
        .plan_trip(ORIGIN, DESTINATION, RouteAlgorithm::AStar)
        .expect("trip");

    assert_eq!(plan.origin.node, 100);
    assert_eq!(plan.destination.node, 115);
    assert!(plan.route.success);
    assert!(plan.walk_start_m > 0.0 && plan.walk_end_m > 0.0);
    let expected = plan.walk_start_m + plan.route.total_cost + plan.walk_end_m;
    assert!((plan.total_distance() - expected).abs() < 1e-9);
}

#[test]
fn damage_on_slip_road_forces_longer_route() {
    let mut session = session();
    let undamaged = session
        .plan_trip(ORIGIN, DESTINATION, RouteAlgorithm::Dijkstra)
        .expect("trip");

    // Midpoint of the diagonal slip road 105 -> 110.
    let event = session
        .apply_damage_at(GeoPoint::new(-0.1785, -78.4785), Some(5.0))
        .expect("damage");
    assert_eq!(event.blocked.len(), 1);

    let damaged = session
        .plan_trip(ORIGIN, DESTINATION, RouteAlgorithm::Dijkstra)
        .expect("trip");
    assert!(damaged.route.success);
    assert!(damaged.route.total_cost > undamaged.route.total_cost);
    let baseline = damaged.baseline.as_ref().expect("baseline while damaged");
    assert!((baseline.total_cost - undamaged.route.total_cost).abs() < 1e-9);
    assert!((damaged.detour_m().expect("detour") - 65.1).abs() < 1e-6);
}

#[test]
fn simulated_disaster_is_reproducible_across_sessions() {
    let mut first = session();
    let mut second = session();
    let a = first.simulate_disaster(4, 99).expect("simulate").to_vec();
    let b = second.simulate_disaster(4, 99).expect("simulate").to_vec();
    assert_eq!(a, b);
    assert_eq!(first.damage_events().expect("events").len(), 4);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.damage.scatter_radius_min_m = 30.0;
    let err = EmergencySession::<emroute_lib::RoadNetwork>::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn summary_renders_trip_in_both_modes() {
    let mut session = session();
    session
        .apply_damage_at(GeoPoint::new(-0.1785, -78.4785), Some(5.0))
        .expect("damage");
    let plan = session
        .plan_trip(ORIGIN, DESTINATION, RouteAlgorithm::AStar)
        .expect("trip");
    let network = session.network().expect("loaded");

    let summary = RouteSummary::from_trip(network, &plan, false);
    assert_eq!(summary.steps.first().map(|step| step.node), Some(100));
    assert_eq!(summary.steps.last().map(|step| step.node), Some(115));
    assert!(summary.baseline_cost_m.is_some());

    let text = summary.render(RouteRenderMode::PlainText).expect("text");
    assert!(text.starts_with("Route reached:"));
    assert!(text.contains("algorithm: a-star"));
    assert!(text.contains("Undamaged route:"));

    let json = summary.render(RouteRenderMode::Json).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["algorithm"], "a-star");
    assert_eq!(value["success"], true);
    assert!(value["walking"]["start_m"].as_f64().is_some());

    let ignoring = RouteSummary::from_trip(network, &plan, true);
    assert!(ignoring.baseline_cost_m.is_none());
    assert!(ignoring.cost_m < summary.cost_m);
}
