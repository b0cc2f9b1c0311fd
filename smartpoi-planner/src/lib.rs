//! Route planning for `SmartPOI` trips.
//!
//! This crate provides [`RoutePlanner`], which turns a
//! [`RouteRequest`](smartpoi_core::RouteRequest) into a ranked list of
//! [`RouteOption`](smartpoi_core::RouteOption)s. Trips with both endpoints on
//! campus are answered from the campus graph; every other trip asks a
//! [`DirectionsProvider`](smartpoi_core::DirectionsProvider) for each
//! configured profile concurrently and falls back to straight-line estimates
//! when every call fails.
//!
//! The planner never retries a failed call. A profile that fails is dropped
//! from the answer and recorded in the [`PlanDiagnostics`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod planner;

pub use config::PlannerConfig;
pub use planner::{PlanDiagnostics, PlanError, RoutePlan, RoutePlanner};
