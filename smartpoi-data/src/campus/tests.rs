//! Tests for campus definition loading, including integrity checks on the
//! bundled data set.

use super::*;
use geo::Coord;
use rstest::{fixture, rstest};
use smartpoi_core::TripScope;
use tempfile::TempDir;

#[fixture]
fn bundled() -> CampusGraph {
    load_campus_graph(None).expect("bundled campus is valid")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    Utf8PathBuf::from_path_buf(path).expect("temp paths are UTF-8")
}

#[rstest]
fn bundled_graph_has_the_campus_network(bundled: CampusGraph) {
    assert_eq!(bundled.node_count(), 29);
    assert_eq!(bundled.edge_count(), 39);
    assert_eq!(bundled.exits().count(), 4);
}

#[rstest]
fn bundled_graph_is_connected(bundled: CampusGraph) {
    let gate = bundled.node_id("main_gate").expect("main gate exists");
    for node in bundled.nodes() {
        assert!(
            bundled.shortest_path(gate, node).is_ok(),
            "{:?} is not reachable from the main gate",
            bundled.name(node)
        );
    }
}

#[rstest]
#[case("Telecommunication Department", "east_1")]
#[case("Main Campus Gate", "main_gate")]
#[case("Gymnatorium", "gym_area")]
#[case("Pattanagere Metro Station", "pattanagere_metro")]
fn bundled_aliases_resolve(bundled: CampusGraph, #[case] building: &str, #[case] node: &str) {
    let resolved = bundled.building(building).expect("alias exists");
    assert_eq!(bundled.name(resolved), Some(node));
}

#[rstest]
fn bundled_route_between_buildings(bundled: CampusGraph) {
    let library = Coord { x: 77.5015, y: 12.9233 };
    let cafeteria = Coord { x: 77.5009, y: 12.9235 };
    let route = bundled
        .campus_route(library, cafeteria, Some("New Library"), Some("Campus Cafeteria"))
        .expect("connected");

    let names: Vec<_> = route
        .nodes
        .iter()
        .filter_map(|node| bundled.name(*node))
        .collect();
    assert_eq!(names.first(), Some(&"east_1"));
    assert_eq!(names.last(), Some(&"central_hub_1"));
    // east_1 -> central_hub_3 -> central_hub_2 -> central_hub_1
    assert!((route.distance_km - 0.080).abs() < 1e-9);
}

#[rstest]
#[case("Ground Parking")]
#[case("Innovation Center")]
#[case("Old Sports Block")]
#[case("AIML BLOCK")]
#[case("Science Block")]
fn unmapped_buildings_route_from_the_nearest_node(bundled: CampusGraph, #[case] building: &str) {
    assert_eq!(bundled.building(building), None);

    let start = Coord { x: 77.5015, y: 12.9233 };
    let end = Coord { x: 77.5009, y: 12.9235 };
    let named = bundled
        .campus_route(start, end, Some(building), None)
        .expect("connected");
    let unnamed = bundled
        .campus_route(start, end, None, None)
        .expect("connected");
    assert_eq!(named.nodes, unnamed.nodes);
}

#[rstest]
fn bundled_bounds_match_the_campus_box(bundled: CampusGraph) {
    let inside = Coord { x: 77.4995, y: 12.9235 };
    let outside = Coord { x: 77.5946, y: 12.9716 };
    assert_eq!(bundled.bounds().classify(inside, inside), TripScope::Campus);
    assert_eq!(bundled.bounds().classify(inside, outside), TripScope::External);
}

#[rstest]
fn loads_config_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "campus.json", BUNDLED_CAMPUS_JSON);

    let config = load_campus_config(&path).expect("should load");

    assert_eq!(config.nodes.len(), 29);
}

#[rstest]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).expect("UTF-8");

    let err = load_campus_config(&path).expect_err("should fail");

    match err {
        CampusLoadError::Read { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[rstest]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "campus.json", "{\"nodes\": []");

    let err = load_campus_config(&path).expect_err("should fail");

    assert!(matches!(err, CampusLoadError::Parse { .. }));
}

#[rstest]
fn dangling_alias_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let document = r#"{
        "bounds": {"lat_min": 0.0, "lat_max": 1.0, "lon_min": 0.0, "lon_max": 1.0},
        "nodes": [{"id": "a", "lat": 0.5, "lon": 0.5}],
        "edges": [],
        "aliases": [{"name": "Ghost Hall", "node": "nowhere"}]
    }"#;
    let path = write_file(&dir, "campus.json", document);

    let err = load_campus_graph(Some(&path)).expect_err("should fail");

    assert!(matches!(
        err,
        CampusLoadError::Invalid(CampusConfigError::UnknownAliasTarget { .. })
    ));
}
