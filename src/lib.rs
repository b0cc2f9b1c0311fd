//! Facade crate for the SmartPOI route-planning engine.
//!
//! This crate re-exports the core domain types and exposes the planner and
//! the I/O adapters (campus loading, directions provider, spatial-index
//! client) behind feature flags.

#![forbid(unsafe_code)]

pub use smartpoi_core::{
    CampusBounds, CampusConfig, CampusConfigError, CampusGraph, CampusRoute, CategoryFilter,
    Directions, DirectionsError, DirectionsProvider, PoiRecord, PoiSearch, PoiSearchError,
    RouteOption, RouteRequest, RouteRequestValidationError, RouteSource, RoutingError,
    SearchMode, SearchQuery, SearchQueryValidationError, TravelProfile, TripScope,
    haversine_km, rank_by_emissions,
};

#[cfg(feature = "planner")]
pub use smartpoi_planner::{PlanDiagnostics, PlanError, PlannerConfig, RoutePlan, RoutePlanner};

#[cfg(feature = "data")]
pub use smartpoi_data::{
    CampusLoadError, HttpDirectionsProvider, HttpDirectionsProviderConfig, ProcessPoiSearch,
    ProcessPoiSearchConfig, bundled_campus_config, load_campus_config, load_campus_graph,
};
