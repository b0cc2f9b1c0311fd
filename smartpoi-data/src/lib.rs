//! Adapters between the SmartPOI engine and the outside world.
//!
//! Responsibilities:
//! - Call the external directions service over HTTP.
//! - Run the spatial-index collaborator as a child process.
//! - Load campus graph definitions from disk or from the bundled data set.
//!
//! Boundaries:
//! - Do not encode routing rules (they live in `smartpoi-core` and
//!   `smartpoi-planner`).
//! - Keep blocking I/O off async executors; use async-capable clients.
//!
//! Invariants:
//! - Adapters are `Send + Sync` and hold no global mutable state.

#![forbid(unsafe_code)]

pub mod campus;
pub mod routing;
pub mod search;

pub use campus::{CampusLoadError, bundled_campus_config, load_campus_config, load_campus_graph};
pub use routing::{DEFAULT_ORS_BASE_URL, HttpDirectionsProvider, HttpDirectionsProviderConfig};
pub use search::{ProcessPoiSearch, ProcessPoiSearchConfig};
