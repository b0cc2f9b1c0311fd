//! Route requests and the route options returned for them.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TravelProfile;

/// A request to travel between two coordinates.
///
/// Building names are optional hints for the campus graph; they are ignored
/// for trips routed by the external provider.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use smartpoi_core::RouteRequest;
///
/// let request = RouteRequest::new(Coord { x: 77.5, y: 12.9 }, Coord { x: 77.6, y: 13.0 })
///     .with_end_building("Library");
/// assert!(request.validate().is_ok());
/// assert_eq!(request.end_building.as_deref(), Some("Library"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Origin, `x = longitude`, `y = latitude`.
    pub start: Coord<f64>,
    /// Destination, `x = longitude`, `y = latitude`.
    pub end: Coord<f64>,
    /// Building the trip starts from, if known.
    pub start_building: Option<String>,
    /// Building the trip ends at, if known.
    pub end_building: Option<String>,
}

/// Reasons a [`RouteRequest`] is rejected before planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteRequestValidationError {
    /// The start coordinate is not a finite WGS84 position.
    #[error("start coordinate ({lat}, {lon}) is not a valid position")]
    InvalidStart {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// The end coordinate is not a finite WGS84 position.
    #[error("end coordinate ({lat}, {lon}) is not a valid position")]
    InvalidEnd {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
}

impl RouteRequest {
    /// Request a trip without building hints.
    #[must_use]
    pub const fn new(start: Coord<f64>, end: Coord<f64>) -> Self {
        Self {
            start,
            end,
            start_building: None,
            end_building: None,
        }
    }

    /// Attach the name of the building the trip starts from.
    #[must_use]
    pub fn with_start_building(mut self, name: impl Into<String>) -> Self {
        self.start_building = Some(name.into());
        self
    }

    /// Attach the name of the building the trip ends at.
    #[must_use]
    pub fn with_end_building(mut self, name: impl Into<String>) -> Self {
        self.end_building = Some(name.into());
        self
    }

    /// Check that both endpoints are finite positions on the globe.
    ///
    /// # Errors
    ///
    /// Returns the first invalid endpoint.
    pub fn validate(&self) -> Result<(), RouteRequestValidationError> {
        if !is_position(self.start) {
            return Err(RouteRequestValidationError::InvalidStart {
                lat: self.start.y,
                lon: self.start.x,
            });
        }
        if !is_position(self.end) {
            return Err(RouteRequestValidationError::InvalidEnd {
                lat: self.end.y,
                lon: self.end.x,
            });
        }
        Ok(())
    }
}

fn is_position(point: Coord<f64>) -> bool {
    (-90.0..=90.0).contains(&point.y) && (-180.0..=180.0).contains(&point.x)
}

/// Which routing path produced a [`RouteOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Shortest path over the campus graph.
    CampusPath,
    /// Straight line after the campus graph could not connect the endpoints.
    CampusDirect,
    /// The external routing provider.
    Provider,
    /// Straight-line estimate after every provider call failed.
    Estimate,
}

impl RouteSource {
    fn label(self, profile: TravelProfile) -> String {
        let base = profile.label();
        match self {
            Self::CampusPath => format!("{base} (Campus Path)"),
            Self::CampusDirect => format!("{base} (Direct)"),
            Self::Provider => base.to_owned(),
            Self::Estimate => format!("{base} (Estimated)"),
        }
    }
}

/// One way of making a trip, as returned to callers.
///
/// Distances are rounded to two decimals, durations and emissions to one.
/// Geometry is a polyline of `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    /// Travel mode.
    pub profile: TravelProfile,
    /// Human-readable description of mode and source.
    pub label: String,
    /// Trip length in kilometres.
    pub distance_km: f64,
    /// Trip duration in minutes.
    pub duration_min: f64,
    /// Estimated emissions in grams of CO2.
    pub co2_grams: f64,
    /// Ordered `[lat, lon]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

impl RouteOption {
    /// Build an option from unrounded measurements.
    ///
    /// Emissions are derived from `distance_km` and the profile's factor
    /// before any rounding takes place.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use smartpoi_core::{RouteOption, RouteSource, TravelProfile};
    ///
    /// let line = [Coord { x: 77.5, y: 12.9 }, Coord { x: 77.6, y: 13.0 }];
    /// let option = RouteOption::new(TravelProfile::Driving, RouteSource::Provider, 10.0, 15.04, &line);
    /// assert_eq!(option.label, "Car");
    /// assert_eq!(option.co2_grams, 1200.0);
    /// assert_eq!(option.duration_min, 15.0);
    /// assert_eq!(option.geometry[0], [12.9, 77.5]);
    /// ```
    #[must_use]
    pub fn new(
        profile: TravelProfile,
        source: RouteSource,
        distance_km: f64,
        duration_min: f64,
        geometry: &[Coord<f64>],
    ) -> Self {
        Self {
            profile,
            label: source.label(profile),
            distance_km: round_to(distance_km, 2),
            duration_min: round_to(duration_min, 1),
            co2_grams: round_to(profile.emissions_g(distance_km), 1),
            geometry: geometry.iter().map(|c| [c.y, c.x]).collect(),
        }
    }

    /// Build an option whose duration follows from the profile's average
    /// speed.
    #[must_use]
    pub fn at_average_speed(
        profile: TravelProfile,
        source: RouteSource,
        distance_km: f64,
        geometry: &[Coord<f64>],
    ) -> Self {
        Self::new(
            profile,
            source,
            distance_km,
            profile.estimated_minutes(distance_km),
            geometry,
        )
    }
}

/// Sort options by ascending emissions, keeping input order among equals.
///
/// # Examples
///
/// ```
/// use smartpoi_core::{RouteOption, RouteSource, TravelProfile, rank_by_emissions};
///
/// let mut options = vec![
///     RouteOption::at_average_speed(TravelProfile::Driving, RouteSource::Estimate, 1.0, &[]),
///     RouteOption::at_average_speed(TravelProfile::Walking, RouteSource::Estimate, 1.0, &[]),
/// ];
/// rank_by_emissions(&mut options);
/// assert_eq!(options[0].profile, TravelProfile::Walking);
/// ```
pub fn rank_by_emissions(options: &mut [RouteOption]) {
    options.sort_by(|lhs, rhs| lhs.co2_grams.total_cmp(&rhs.co2_grams));
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
