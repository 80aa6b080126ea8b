mod common;

use std::fs;

use emroute_lib::{load_network, EdgeKey, Error, RoadGraph};
use tempfile::tempdir;

use common::{downtown_grid, fixtures_dir};

#[test]
fn downtown_fixture_loads() {
    let network = downtown_grid();
    assert_eq!(network.node_count(), 16);
    assert_eq!(network.edge_count(), 50);

    let service = network
        .edge(EdgeKey::new(100, 101, 1))
        .expect("service road is the second parallel edge");
    assert_eq!(service.weight, Some(210.0));
    assert_eq!(service.geometry.as_ref().map(Vec::len), Some(3));

    assert!(network.edge(EdgeKey::new(105, 110, 0)).is_some());
    assert!(network.edge(EdgeKey::new(110, 105, 0)).is_none(), "slip road is one-way");
    assert_eq!(network.neighbors(100).collect::<Vec<_>>(), vec![101, 104]);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_network(&fixtures_dir().join("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"nodes": [{"id": 1, "lat": 1e400, "lon": 0.0}], "edges": []}"#,
    )
    .expect("write fixture");

    let err = load_network(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidNetwork { .. } | Error::Json(_)));
}
