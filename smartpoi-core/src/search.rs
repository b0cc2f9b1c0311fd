//! Requests to the point-of-interest spatial index.
//!
//! The spatial index is a collaborator process, not part of the engine. This
//! module fixes its request and response shapes and the [`PoiSearch`] seam
//! through which it is called, so that callers can be exercised against a
//! stub.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category restriction applied to a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category matches.
    #[default]
    All,
    /// Only points whose category equals the name, ignoring case.
    Named(String),
}

impl CategoryFilter {
    /// Parse a user-supplied filter; `all` and blank input select everything.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(trimmed.to_owned())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// How candidate points are selected around the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMode {
    /// Every match within the radius, in kilometres.
    Radius {
        /// Search radius in kilometres.
        km: f64,
    },
    /// The `k` nearest matches.
    Nearest {
        /// Number of results requested.
        k: u32,
    },
}

/// A validated spatial-index query.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use smartpoi_core::{CategoryFilter, SearchMode, SearchQuery};
///
/// let query = SearchQuery::new(Coord { x: 77.5, y: 12.92 }, SearchMode::Nearest { k: 3 })
///     .with_category(CategoryFilter::parse("cafe"))
///     .with_text("coffee");
/// assert!(query.validate().is_ok());
/// assert_eq!(query.text.as_deref(), Some("coffee"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Query point, `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Category restriction.
    pub category: CategoryFilter,
    /// Radius or k-nearest selection.
    pub mode: SearchMode,
    /// Case-insensitive substring matched against name and category.
    pub text: Option<String>,
}

/// Reasons a [`SearchQuery`] is rejected before the index is called.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchQueryValidationError {
    /// The query point is not a finite WGS84 position.
    #[error("search location ({lat}, {lon}) is not a valid position")]
    InvalidLocation {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// The radius is zero, negative or not finite.
    #[error("search radius must be a positive number of kilometres, got {km}")]
    InvalidRadius {
        /// Supplied radius.
        km: f64,
    },
    /// Zero nearest neighbours were requested.
    #[error("k-nearest search needs k of at least 1")]
    ZeroNeighbours,
}

impl SearchQuery {
    /// Query every category around `location` without a text filter.
    #[must_use]
    pub const fn new(location: Coord<f64>, mode: SearchMode) -> Self {
        Self {
            location,
            category: CategoryFilter::All,
            mode,
            text: None,
        }
    }

    /// Restrict the search to a category.
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Add a free-text filter; blank text leaves the query unfiltered.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Check the location and mode parameters.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> Result<(), SearchQueryValidationError> {
        let Coord { x: lon, y: lat } = self.location;
        if !((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)) {
            return Err(SearchQueryValidationError::InvalidLocation { lat, lon });
        }
        match self.mode {
            SearchMode::Radius { km } if !(km.is_finite() && km > 0.0) => {
                Err(SearchQueryValidationError::InvalidRadius { km })
            }
            SearchMode::Nearest { k: 0 } => Err(SearchQueryValidationError::ZeroNeighbours),
            _ => Ok(()),
        }
    }
}

/// One point returned by the spatial index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    /// Identifier assigned by the index.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Category.
    #[serde(rename = "type")]
    pub category: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Distance from the query point, when the index reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Failures calling the spatial index.
///
/// Every variant is surfaced to the caller: an empty answer would be
/// indistinguishable from "nothing nearby".
#[derive(Debug, Error)]
pub enum PoiSearchError {
    /// The query failed validation.
    #[error(transparent)]
    InvalidQuery(#[from] SearchQueryValidationError),
    /// The index process could not be started.
    #[error("failed to start spatial index {program:?}: {source}")]
    Spawn {
        /// Executable that was launched.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The index did not finish within the configured timeout.
    #[error("spatial index timed out after {timeout_secs}s")]
    Timeout {
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The index exited unsuccessfully.
    #[error("spatial index exited with {status}: {stderr}")]
    NonZeroExit {
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The index printed something other than a JSON array of records.
    #[error("spatial index returned malformed output: {message}")]
    MalformedOutput {
        /// Decoder error detail.
        message: String,
    },
}

/// Run a query against the spatial index.
#[async_trait]
pub trait PoiSearch: Send + Sync {
    /// Return the records matching `query`, in the index's ranking order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PoiRecord>, PoiSearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn point() -> Coord<f64> {
        Coord { x: 77.5, y: 12.92 }
    }

    #[rstest]
    #[case("all", CategoryFilter::All)]
    #[case("ALL", CategoryFilter::All)]
    #[case("  ", CategoryFilter::All)]
    #[case(" cafe ", CategoryFilter::Named("cafe".into()))]
    fn parses_category_filters(#[case] raw: &str, #[case] expected: CategoryFilter) {
        assert_eq!(CategoryFilter::parse(raw), expected);
    }

    #[rstest]
    #[case(SearchMode::Radius { km: 0.0 })]
    #[case(SearchMode::Radius { km: -1.0 })]
    #[case(SearchMode::Radius { km: f64::NAN })]
    #[case(SearchMode::Nearest { k: 0 })]
    fn rejects_degenerate_modes(#[case] mode: SearchMode) {
        assert!(SearchQuery::new(point(), mode).validate().is_err());
    }

    #[rstest]
    fn rejects_invalid_location() {
        let query = SearchQuery::new(Coord { x: 200.0, y: 0.0 }, SearchMode::Nearest { k: 1 });
        assert!(matches!(
            query.validate(),
            Err(SearchQueryValidationError::InvalidLocation { .. })
        ));
    }

    #[rstest]
    fn blank_text_is_dropped() {
        let query = SearchQuery::new(point(), SearchMode::Nearest { k: 1 }).with_text("   ");
        assert_eq!(query.text, None);
    }

    #[rstest]
    fn records_use_the_index_field_names() {
        let json = r#"{"id": 7, "name": "Cafe", "type": "cafe", "lat": 12.92, "lon": 77.5}"#;
        let record: PoiRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(record.category, "cafe");
        assert_eq!(record.distance_km, None);
        let round_trip = serde_json::to_value(&record).expect("encode");
        assert_eq!(round_trip["type"], "cafe");
        assert!(round_trip.get("distance_km").is_none());
    }
}
