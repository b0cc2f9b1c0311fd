//! Test utilities for directions providers.
//!
//! This module provides [`StubDirectionsProvider`], a deterministic test
//! double for [`DirectionsProvider`] that answers each profile from a
//! pre-configured table without making HTTP requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use smartpoi_core::{Directions, DirectionsError, DirectionsProvider, TravelProfile};

/// Stub `DirectionsProvider` for testing.
///
/// Profiles without a configured answer fail with a
/// [`DirectionsError::NetworkError`]. An optional per-profile delay is
/// applied with `tokio::time::sleep`, so paused-clock tests can drive
/// timeouts deterministically.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use smartpoi_core::{DirectionsProvider, TravelProfile};
/// use smartpoi_data::routing::test_support::StubDirectionsProvider;
///
/// # tokio_test_block(async {
/// let provider = StubDirectionsProvider::new()
///     .with_route(TravelProfile::Walking, 2_000.0, 1_500.0);
/// let origin = Coord { x: 77.5, y: 12.9 };
/// let destination = Coord { x: 77.51, y: 12.91 };
///
/// let walking = provider
///     .directions(TravelProfile::Walking, origin, destination)
///     .await;
/// assert!(walking.is_ok());
/// let driving = provider
///     .directions(TravelProfile::Driving, origin, destination)
///     .await;
/// assert!(driving.is_err());
/// assert_eq!(provider.calls(), 2);
/// # });
/// # fn tokio_test_block(fut: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread()
/// #         .enable_all()
/// #         .build()
/// #         .expect("runtime")
/// #         .block_on(fut);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StubDirectionsProvider {
    responses: HashMap<TravelProfile, StubResponse>,
    delays: HashMap<TravelProfile, Duration>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Route { distance_m: f64, duration_s: f64 },
    Error(DirectionsError),
}

impl StubDirectionsProvider {
    /// Create a provider that fails every profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `profile` with a straight two-point route of the given size.
    #[must_use]
    pub fn with_route(mut self, profile: TravelProfile, distance_m: f64, duration_s: f64) -> Self {
        self.responses.insert(
            profile,
            StubResponse::Route {
                distance_m,
                duration_s,
            },
        );
        self
    }

    /// Answer `profile` with `error`.
    #[must_use]
    pub fn with_error(mut self, profile: TravelProfile, error: DirectionsError) -> Self {
        self.responses.insert(profile, StubResponse::Error(error));
        self
    }

    /// Answer every profile with `error`.
    #[must_use]
    pub fn failing(error: DirectionsError) -> Self {
        TravelProfile::PROVIDER_ORDER
            .into_iter()
            .fold(Self::new(), |stub, profile| {
                stub.with_error(profile, error.clone())
            })
    }

    /// Delay every answer for `profile` by `delay`.
    #[must_use]
    pub fn with_delay(mut self, profile: TravelProfile, delay: Duration) -> Self {
        self.delays.insert(profile, delay);
        self
    }

    /// Number of `directions` calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for StubDirectionsProvider {
    async fn directions(
        &self,
        profile: TravelProfile,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Directions, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&profile) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&profile) {
            Some(StubResponse::Route {
                distance_m,
                duration_s,
            }) => Ok(Directions {
                geometry: vec![origin, destination],
                distance_m: *distance_m,
                duration_s: *duration_s,
            }),
            Some(StubResponse::Error(error)) => Err(error.clone()),
            None => Err(DirectionsError::NetworkError {
                url: format!("stub://{}", profile.provider_id()),
                message: "no stub response configured".to_owned(),
            }),
        }
    }
}
