//! Axis-aligned campus boundary test.

use geo::Coord;
use log::debug;
use serde::{Deserialize, Serialize};

use super::CampusConfigError;

/// Inclusive latitude/longitude box enclosing the campus.
///
/// The box is configuration in its own right and is not derived from the
/// node table, so graph nodes may lie outside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampusBounds {
    /// Southern edge in degrees.
    pub lat_min: f64,
    /// Northern edge in degrees.
    pub lat_max: f64,
    /// Western edge in degrees.
    pub lon_min: f64,
    /// Eastern edge in degrees.
    pub lon_max: f64,
}

/// Which routing path a trip is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripScope {
    /// Both endpoints lie on campus; the campus graph answers.
    Campus,
    /// At least one endpoint lies off campus; the external provider answers.
    External,
}

impl CampusBounds {
    /// Construct bounds from their four edges.
    #[must_use]
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Whether `point` lies inside the box, boundary included.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use smartpoi_core::CampusBounds;
    ///
    /// let bounds = CampusBounds::new(12.922, 12.925, 77.498, 77.501);
    /// assert!(bounds.contains(Coord { x: 77.498, y: 12.922 }));
    /// assert!(!bounds.contains(Coord { x: 77.6, y: 13.0 }));
    /// ```
    #[must_use]
    pub fn contains(&self, point: Coord<f64>) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.y)
            && (self.lon_min..=self.lon_max).contains(&point.x)
    }

    /// Decide which routing path serves a trip from `start` to `end`.
    ///
    /// Only trips with both endpoints on campus use the campus graph. A trip
    /// leaving or entering the campus is routed externally in full.
    #[must_use]
    pub fn classify(&self, start: Coord<f64>, end: Coord<f64>) -> TripScope {
        match (self.contains(start), self.contains(end)) {
            (true, true) => TripScope::Campus,
            (false, false) => TripScope::External,
            (start_inside, _) => {
                debug!(
                    "trip crosses the campus boundary (start on campus: {start_inside}); routing externally"
                );
                TripScope::External
            }
        }
    }

    pub(super) fn validate(&self) -> Result<(), CampusConfigError> {
        let finite = [self.lat_min, self.lat_max, self.lon_min, self.lon_max]
            .iter()
            .all(|v| v.is_finite());
        if finite && self.lat_min <= self.lat_max && self.lon_min <= self.lon_max {
            Ok(())
        } else {
            Err(CampusConfigError::InvalidBounds { bounds: *self })
        }
    }
}
