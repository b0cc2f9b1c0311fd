//! Point-to-point directions from an external routing provider.
//!
//! The [`DirectionsProvider`] trait is the engine's only view of the
//! multi-modal routing service. Each call asks for one profile between two
//! coordinates; failures are scoped to that call so that the planner can
//! drop a single profile without losing the others.

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::TravelProfile;

/// A successful provider answer for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Route polyline with `x = longitude`, `y = latitude`.
    pub geometry: Vec<Coord<f64>>,
    /// Route length in metres.
    pub distance_m: f64,
    /// Travel time in seconds.
    pub duration_s: f64,
}

impl Directions {
    /// Route length in kilometres.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Travel time in minutes.
    #[must_use]
    pub fn duration_min(&self) -> f64 {
        self.duration_s / 60.0
    }
}

/// Errors from [`DirectionsProvider::directions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionsError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL, without credentials.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL, without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL, without credentials.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse directions response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
    /// The response decoded but contained no route.
    #[error("directions response for {profile} contained no route")]
    MissingRoute {
        /// Profile that was requested.
        profile: TravelProfile,
    },
}

/// Fetch directions for a single travel profile.
///
/// Implementations must be cheap to call concurrently: the planner issues
/// one call per profile at the same time and drops outstanding calls when a
/// request is cancelled or its deadline passes.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use geo::Coord;
/// use smartpoi_core::{Directions, DirectionsError, DirectionsProvider, TravelProfile};
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl DirectionsProvider for StraightLine {
///     async fn directions(
///         &self,
///         _profile: TravelProfile,
///         origin: Coord<f64>,
///         destination: Coord<f64>,
///     ) -> Result<Directions, DirectionsError> {
///         Ok(Directions {
///             geometry: vec![origin, destination],
///             distance_m: 1000.0,
///             duration_s: 600.0,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Return the provider's route from `origin` to `destination`.
    async fn directions(
        &self,
        profile: TravelProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Directions, DirectionsError>;
}

#[async_trait]
impl<T> DirectionsProvider for std::sync::Arc<T>
where
    T: DirectionsProvider + ?Sized,
{
    async fn directions(
        &self,
        profile: TravelProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Directions, DirectionsError> {
        (**self).directions(profile, origin, destination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn converts_units() {
        let directions = Directions {
            geometry: Vec::new(),
            distance_m: 2500.0,
            duration_s: 90.0,
        };
        assert_eq!(directions.distance_km(), 2.5);
        assert_eq!(directions.duration_min(), 1.5);
    }

    #[rstest]
    fn errors_render_without_credentials() {
        let err = DirectionsError::HttpError {
            url: "https://example.com/v2/directions/driving-car".into(),
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://example.com/v2/directions/driving-car failed with HTTP 403: forbidden"
        );
    }
}
