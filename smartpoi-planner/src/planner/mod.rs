//! `RoutePlanner` implementation.
//!
//! A request moves through classify, route, rank and respond. Campus trips
//! stay on the campus graph; external trips fan out to the provider, one
//! call per profile, under a per-call timeout and a shared deadline.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use geo::Coord;
use log::{debug, info, warn};
use smartpoi_core::{
    CampusGraph, DirectionsProvider, RouteOption, RouteRequest, RouteRequestValidationError,
    RouteSource, TravelProfile, TripScope, haversine_km, rank_by_emissions,
};
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;

use crate::PlannerConfig;

/// Profiles offered for trips answered from the campus graph.
const CAMPUS_PROFILES: [TravelProfile; 2] = [TravelProfile::Walking, TravelProfile::Cycling];

/// Errors from [`RoutePlanner::plan`].
#[derive(Debug, Error)]
pub enum PlanError {
    /// The request coordinates are not valid positions.
    #[error(transparent)]
    InvalidRequest(#[from] RouteRequestValidationError),
    /// The caller cancelled the request before it completed.
    #[error("route planning was cancelled")]
    Cancelled,
    /// No option could be produced, which only happens when no profile is
    /// configured.
    #[error("no route options could be produced")]
    NoRoutes,
}

/// How a [`RoutePlan`] was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDiagnostics {
    /// Whether the trip stayed on campus.
    pub scope: TripScope,
    /// Which routing path produced the options.
    pub source: RouteSource,
    /// Provider profiles that failed or timed out, in request order.
    pub failed_profiles: Vec<TravelProfile>,
    /// Wall time spent planning.
    pub elapsed: Duration,
}

/// Ranked options plus diagnostics for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Options sorted by ascending emissions.
    pub options: Vec<RouteOption>,
    /// How the options were produced.
    pub diagnostics: PlanDiagnostics,
}

/// Plans trips over the campus graph and an external directions provider.
///
/// The campus graph is shared read-only, so one planner can serve
/// concurrent requests.
#[derive(Debug)]
pub struct RoutePlanner<P>
where
    P: DirectionsProvider,
{
    campus: Arc<CampusGraph>,
    provider: P,
    config: PlannerConfig,
}

impl<P> RoutePlanner<P>
where
    P: DirectionsProvider,
{
    /// Construct a planner using default configuration.
    #[must_use]
    pub fn new(campus: Arc<CampusGraph>, provider: P) -> Self {
        Self::with_config(campus, provider, PlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    #[must_use]
    pub const fn with_config(campus: Arc<CampusGraph>, provider: P, config: PlannerConfig) -> Self {
        Self {
            campus,
            provider,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidRequest`] for out-of-range coordinates
    /// and [`PlanError::NoRoutes`] if no option could be produced. Provider
    /// failures are never returned; they are absorbed by fallbacks.
    pub async fn plan(&self, request: &RouteRequest) -> Result<RoutePlan, PlanError> {
        request.validate()?;
        let started_at = Instant::now();

        let scope = self.campus.bounds().classify(request.start, request.end);
        let (mut options, source, failed_profiles) = match scope {
            TripScope::Campus => {
                let (options, source) = self.campus_options(request);
                (options, source, Vec::new())
            }
            TripScope::External => self.external_options(request).await,
        };

        if options.is_empty() {
            return Err(PlanError::NoRoutes);
        }
        rank_by_emissions(&mut options);

        let diagnostics = PlanDiagnostics {
            scope,
            source,
            failed_profiles,
            elapsed: started_at.elapsed(),
        };
        info!(
            "planned {:?} trip via {:?}: {} options in {:?}",
            diagnostics.scope,
            diagnostics.source,
            options.len(),
            diagnostics.elapsed
        );
        Ok(RoutePlan {
            options,
            diagnostics,
        })
    }

    /// Plan a trip, abandoning it as soon as `token` is cancelled.
    ///
    /// Outstanding provider calls are dropped, which closes their
    /// connections.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Cancelled`] when the token fires first, and
    /// otherwise the errors of [`RoutePlanner::plan`].
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "tokio::select! expands to a modulo for branch fairness"
    )]
    pub async fn plan_with_cancellation(
        &self,
        request: &RouteRequest,
        token: &CancellationToken,
    ) -> Result<RoutePlan, PlanError> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("route planning cancelled");
                Err(PlanError::Cancelled)
            }
            plan = self.plan(request) => plan,
        }
    }

    fn campus_options(&self, request: &RouteRequest) -> (Vec<RouteOption>, RouteSource) {
        match self.campus.campus_route(
            request.start,
            request.end,
            request.start_building.as_deref(),
            request.end_building.as_deref(),
        ) {
            Ok(route) => {
                let options = CAMPUS_PROFILES
                    .iter()
                    .map(|profile| {
                        RouteOption::at_average_speed(
                            *profile,
                            RouteSource::CampusPath,
                            route.distance_km,
                            &route.geometry,
                        )
                    })
                    .collect();
                (options, RouteSource::CampusPath)
            }
            Err(err) => {
                warn!("campus routing failed, using a direct line: {err}");
                let options = straight_line_options(
                    &CAMPUS_PROFILES,
                    RouteSource::CampusDirect,
                    request.start,
                    request.end,
                );
                (options, RouteSource::CampusDirect)
            }
        }
    }

    async fn external_options(
        &self,
        request: &RouteRequest,
    ) -> (Vec<RouteOption>, RouteSource, Vec<TravelProfile>) {
        // A deadline too far away to represent is no deadline at all.
        let request_deadline = Instant::now().checked_add(self.config.request_deadline());
        let per_call = self.config.per_profile_timeout;
        let provider = &self.provider;
        let (start, end) = (request.start, request.end);

        let calls = self.config.profiles.iter().map(|&profile| async move {
            let call_deadline = earliest(request_deadline, Instant::now().checked_add(per_call));
            let call = provider.directions(profile, start, end);
            let outcome = match call_deadline {
                Some(deadline) => timeout_at(deadline, call).await,
                None => Ok(call.await),
            };
            (profile, outcome)
        });
        let outcomes = join_all(calls).await;

        let mut options = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (profile, outcome) in outcomes {
            match outcome {
                Ok(Ok(directions)) => options.push(RouteOption::new(
                    profile,
                    RouteSource::Provider,
                    directions.distance_km(),
                    directions.duration_min(),
                    &directions.geometry,
                )),
                Ok(Err(err)) => {
                    warn!("{profile} directions failed: {err}");
                    failed.push(profile);
                }
                Err(_) => {
                    warn!("{profile} directions timed out");
                    failed.push(profile);
                }
            }
        }

        if !options.is_empty() {
            return (options, RouteSource::Provider, failed);
        }

        warn!("every directions call failed, using straight-line estimates");
        let profiles: Vec<TravelProfile> = TravelProfile::ESTIMATE_ORDER
            .into_iter()
            .filter(|profile| self.config.profiles.contains(profile))
            .collect();
        let estimates = straight_line_options(&profiles, RouteSource::Estimate, start, end);
        (estimates, RouteSource::Estimate, failed)
    }
}

/// One option per profile along the straight line from `start` to `end`.
fn straight_line_options(
    profiles: &[TravelProfile],
    source: RouteSource,
    start: Coord<f64>,
    end: Coord<f64>,
) -> Vec<RouteOption> {
    let distance_km = haversine_km(start, end);
    let line = [start, end];
    profiles
        .iter()
        .map(|profile| RouteOption::at_average_speed(*profile, source, distance_km, &line))
        .collect()
}

/// The earlier of two optional deadlines, where `None` means unbounded.
fn earliest(first: Option<Instant>, second: Option<Instant>) -> Option<Instant> {
    match (first, second) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => first.or(second),
    }
}
