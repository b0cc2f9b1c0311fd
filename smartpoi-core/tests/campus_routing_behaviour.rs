//! Behavioural tests for routing over the campus graph.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use smartpoi_core::test_support::{lat_lon, sample_campus_config};
use smartpoi_core::{CampusGraph, CampusRoute, RoutingError, TripScope};

type RouteCell = RefCell<Option<Result<CampusRoute, RoutingError>>>;

#[fixture]
fn graph() -> RefCell<Option<CampusGraph>> {
    RefCell::new(None)
}

#[fixture]
fn route() -> RouteCell {
    RefCell::new(None)
}

#[fixture]
fn scope() -> RefCell<Option<TripScope>> {
    RefCell::new(None)
}

fn run_route(
    graph: &RefCell<Option<CampusGraph>>,
    route: &RouteCell,
    start: (f64, f64),
    start_building: Option<&str>,
    end: (f64, f64),
) {
    let guard = graph.borrow();
    let campus = guard.as_ref().expect("campus must be loaded");
    *route.borrow_mut() = Some(campus.campus_route(
        lat_lon(start.0, start.1),
        lat_lon(end.0, end.1),
        start_building,
        None,
    ));
}

fn node_names(graph: &RefCell<Option<CampusGraph>>, route: &RouteCell) -> Vec<String> {
    let campus_guard = graph.borrow();
    let campus = campus_guard.as_ref().expect("campus must be loaded");
    let route_guard = route.borrow();
    let found = route_guard
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected a route");
    found
        .nodes
        .iter()
        .filter_map(|node| campus.name(*node).map(str::to_owned))
        .collect()
}

// --- Given steps ---

#[given("the sample campus")]
fn sample_campus(#[from(graph)] graph: &RefCell<Option<CampusGraph>>) {
    let built = CampusGraph::build(&sample_campus_config()).expect("sample config is valid");
    *graph.borrow_mut() = Some(built);
}

// --- When steps ---

#[when("I route from corner a to corner d")]
fn route_a_to_d(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(route)] route: &RouteCell,
) {
    run_route(graph, route, (12.9240, 77.4990), None, (12.9230, 77.4990));
}

#[when("I route from the south-east corner using the Main Gate alias to corner a")]
fn route_from_named_building(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(route)] route: &RouteCell,
) {
    run_route(
        graph,
        route,
        (12.9222, 77.5009),
        Some("Main Gate"),
        (12.9240, 77.4990),
    );
}

#[when("I route from corner a to the isolated node")]
fn route_to_isolated(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(route)] route: &RouteCell,
) {
    run_route(graph, route, (12.9240, 77.4990), None, (12.9222, 77.5008));
}

#[when("I classify a trip from corner a to the city centre")]
fn classify_external(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(scope)] scope: &RefCell<Option<TripScope>>,
) {
    let guard = graph.borrow();
    let campus = guard.as_ref().expect("campus must be loaded");
    *scope.borrow_mut() = Some(
        campus
            .bounds()
            .classify(lat_lon(12.9240, 77.4990), lat_lon(12.9716, 77.5946)),
    );
}

// --- Then steps ---

#[then("the route visits a, b, c and d")]
fn visits_detour(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(route)] route: &RouteCell,
) {
    assert_eq!(node_names(graph, route), ["a", "b", "c", "d"]);
}

#[then("the route is 0.3 km long")]
fn route_length(#[from(route)] route: &RouteCell) {
    let guard = route.borrow();
    let found = guard
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected a route");
    assert!(
        (found.distance_km - 0.3).abs() < 1e-9,
        "unexpected distance {}",
        found.distance_km
    );
}

#[then("the route starts at the gate node")]
fn starts_at_gate(
    #[from(graph)] graph: &RefCell<Option<CampusGraph>>,
    #[from(route)] route: &RouteCell,
) {
    let names = node_names(graph, route);
    assert_eq!(names.first().map(String::as_str), Some("gate"));
    assert_eq!(names.last().map(String::as_str), Some("a"));
}

#[then("an unreachable error is returned")]
fn unreachable(#[from(route)] route: &RouteCell) {
    let guard = route.borrow();
    assert!(
        matches!(&*guard, Some(Err(RoutingError::Unreachable { .. }))),
        "expected Unreachable, got {guard:?}"
    );
}

#[then("the trip is external")]
fn trip_is_external(#[from(scope)] scope: &RefCell<Option<TripScope>>) {
    assert_eq!(*scope.borrow(), Some(TripScope::External));
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/campus_routing.feature", name = $title)]
        fn $fn_name(
            graph: RefCell<Option<CampusGraph>>,
            route: RouteCell,
            scope: RefCell<Option<TripScope>>,
        ) {
            let _ = (graph, route, scope);
        }
    };
}

register_scenario!(
    preferring_the_detour,
    "preferring the shorter detour over a long direct edge"
);
register_scenario!(
    building_overrides_coordinate,
    "a building name overrides the start coordinate"
);
register_scenario!(reporting_disconnected_nodes, "reporting disconnected nodes");
register_scenario!(classifying_external_trip, "classifying a trip that leaves campus");
