//! HTTP directions from an OpenRouteService-compatible provider.
//!
//! [`HttpDirectionsProvider`] implements [`smartpoi_core::DirectionsProvider`]
//! against the ORS v2 directions API: one `GET` per profile, answered with a
//! GeoJSON feature collection whose first feature carries the route.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use smartpoi_core::{DirectionsProvider, TravelProfile};
//! use smartpoi_data::routing::{HttpDirectionsProvider, HttpDirectionsProviderConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpDirectionsProviderConfig::default()
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_secs(5));
//! let provider = HttpDirectionsProvider::with_config(config)?;
//!
//! let directions = provider
//!     .directions(
//!         TravelProfile::Cycling,
//!         Coord { x: 77.5, y: 12.9 },
//!         Coord { x: 77.6, y: 13.0 },
//!     )
//!     .await?;
//! println!("{:.1} km", directions.distance_km());
//! # Ok(())
//! # }
//! ```

mod ors;
mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use provider::{
    DEFAULT_ORS_BASE_URL, DEFAULT_USER_AGENT, HttpDirectionsProvider,
    HttpDirectionsProviderConfig, ProviderBuildError,
};
