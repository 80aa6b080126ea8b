mod common;

use emroute_lib::{
    apply_damage_circle, compare_algorithms, find_route, plan_route, resolve_weight,
    AlgorithmComparison, Error, RouteAlgorithm, RouteRequest, SearchOptions,
};

use common::{downtown_grid, grid, grid_id, square};

#[test]
fn blocked_square_returns_fallback_toward_target() {
    let mut network = square();
    // Cut both edges between the {A, B} side and the {C, D} side.
    apply_damage_circle(&mut network, 0.0005, 0.001, 10.0).expect("cut B-C");
    apply_damage_circle(&mut network, 0.0005, 0.0, 10.0).expect("cut D-A");

    for algorithm in [RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar] {
        let result = find_route(&network, 1, 3, algorithm, false).expect("search runs");
        assert!(!result.success, "{algorithm} should not reach C");
        assert_eq!(result.path, vec![1, 2], "{algorithm} falls back to B");
        assert_eq!(result.visited_count, 2);
        assert!((result.total_cost - 111.2).abs() < 1e-9);
    }
}

#[test]
fn ignoring_damage_reaches_target_through_cut() {
    let mut network = square();
    apply_damage_circle(&mut network, 0.0005, 0.001, 10.0).expect("cut B-C");
    apply_damage_circle(&mut network, 0.0005, 0.0, 10.0).expect("cut D-A");

    let result = find_route(&network, 1, 3, RouteAlgorithm::AStar, true).expect("search runs");
    assert!(result.success);
    assert_eq!(result.hop_count(), 2);
    assert!((result.total_cost - 222.4).abs() < 1e-9);
}

#[test]
fn astar_and_dijkstra_agree_on_undamaged_grid() {
    let network = grid(8, 8, 0.001);
    let cols = 8;
    let pairs = [
        (grid_id(cols, 0, 0), grid_id(cols, 7, 7)),
        (grid_id(cols, 3, 1), grid_id(cols, 0, 6)),
        (grid_id(cols, 7, 0), grid_id(cols, 2, 5)),
    ];
    for (start, goal) in pairs {
        let comparison =
            compare_algorithms(&network, start, goal, &SearchOptions::default()).expect("compare");
        assert!(comparison.dijkstra.success && comparison.a_star.success);
        assert!(
            comparison.costs_agree(),
            "{start}->{goal}: {} vs {}",
            comparison.dijkstra.total_cost,
            comparison.a_star.total_cost
        );
        assert!(comparison.a_star.visited_count <= comparison.dijkstra.visited_count);
        assert!(AlgorithmComparison::efficiency(&comparison.a_star) > 0.0);
    }
}

#[test]
fn astar_and_dijkstra_agree_after_damage() {
    let mut network = grid(6, 6, 0.001);
    apply_damage_circle(&mut network, 0.0025, 0.0025, 120.0).expect("damage center");
    let options = SearchOptions::default();
    let comparison = compare_algorithms(&network, grid_id(6, 0, 0), grid_id(6, 5, 5), &options)
        .expect("compare");
    assert!(comparison.dijkstra.success);
    assert!(comparison.costs_agree());
}

#[test]
fn fixture_route_uses_slip_road() {
    let network = downtown_grid();
    for algorithm in [RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar] {
        let result = plan_route(&network, &RouteRequest::new(100, 115, algorithm)).expect("route");
        assert!(result.success);
        assert!((result.total_cost - 602.1).abs() < 1e-6, "{algorithm}: {}", result.total_cost);
        assert!(
            result.path.windows(2).any(|pair| pair == [105, 110]),
            "{algorithm} path {:?}",
            result.path
        );
    }
}

#[test]
fn blocked_main_road_falls_back_to_service_road() {
    let mut network = downtown_grid();
    assert_eq!(resolve_weight(&network, 100, 101, false), 111.2);

    // Midpoint of the straight 100-101 street; the bent service road stays open.
    let blocked = apply_damage_circle(&mut network, -0.18, -78.4795, 5.0).expect("damage");
    assert_eq!(blocked.len(), 2);
    assert_eq!(resolve_weight(&network, 100, 101, false), 210.0);
    assert_eq!(resolve_weight(&network, 101, 100, false), f64::INFINITY);
    assert_eq!(resolve_weight(&network, 101, 100, true), 111.2);
}

#[test]
fn unknown_endpoint_is_an_error() {
    let network = square();
    let err = find_route(&network, 1, 99, RouteAlgorithm::Dijkstra, false).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { node: 99 }));
}
