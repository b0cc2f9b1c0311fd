//! Core domain types for the SmartPOI route-planning engine.
//!
//! The crate owns everything that can be computed without I/O: great-circle
//! distances, the campus road graph and its shortest-path solver, the
//! campus boundary test, travel profiles and the route options handed back
//! to callers. The boundaries to the outside world are expressed as traits:
//! [`DirectionsProvider`] for the external multi-profile routing service and
//! [`PoiSearch`] for the spatial-index collaborator.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod campus;
pub mod directions;
mod distance;
mod profile;
mod route;
pub mod search;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use campus::{
    CampusBounds, CampusConfig, CampusConfigError, CampusGraph, CampusRoute, NodeId,
    RoutingError, ShortestPath, TripScope,
};
pub use directions::{Directions, DirectionsError, DirectionsProvider};
pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use profile::{TravelProfile, UnknownProfile};
pub use route::{
    RouteOption, RouteRequest, RouteRequestValidationError, RouteSource, rank_by_emissions,
};
pub use search::{
    CategoryFilter, PoiRecord, PoiSearch, PoiSearchError, SearchMode, SearchQuery,
    SearchQueryValidationError,
};
