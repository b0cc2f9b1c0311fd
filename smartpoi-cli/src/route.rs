//! Route command implementation for the SmartPOI CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use smartpoi_core::{DirectionsProvider, RouteRequest};
use smartpoi_data::load_campus_graph;
use smartpoi_data::routing::{
    DEFAULT_ORS_BASE_URL, HttpDirectionsProvider, HttpDirectionsProviderConfig,
};
use smartpoi_planner::{PlanError, PlannerConfig, RoutePlanner};
use tokio_util::sync::CancellationToken;

use crate::{
    ARG_CAMPUS_CONFIG, ARG_END_BUILDING, ARG_END_LAT, ARG_END_LON, ARG_ORS_API_KEY,
    ARG_ORS_BASE_URL, ARG_START_BUILDING, ARG_START_LAT, ARG_START_LON, ARG_TIMEOUT_SECS,
    CliError, ENV_END_LAT, ENV_END_LON, ENV_START_LAT, ENV_START_LON, write_json,
};

/// Default time allowed for each provider call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a trip between two coordinates. Trips with both ends \
                 inside the campus are routed over the campus road graph; \
                 all other trips are sent to OpenRouteService for walking, \
                 cycling and driving directions. Options are printed as JSON \
                 ranked by estimated CO2 emissions.",
    about = "Plan a trip and rank the route options"
)]
#[ortho_config(prefix = "SMARTPOI")]
pub(crate) struct RouteArgs {
    /// Latitude of the origin.
    #[arg(long = ARG_START_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) start_lat: Option<f64>,
    /// Longitude of the origin.
    #[arg(long = ARG_START_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) start_lon: Option<f64>,
    /// Latitude of the destination.
    #[arg(long = ARG_END_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) end_lat: Option<f64>,
    /// Longitude of the destination.
    #[arg(long = ARG_END_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) end_lon: Option<f64>,
    /// Campus building the trip starts from.
    #[arg(long = ARG_START_BUILDING, value_name = "name")]
    #[serde(default)]
    pub(crate) start_building: Option<String>,
    /// Campus building the trip ends at.
    #[arg(long = ARG_END_BUILDING, value_name = "name")]
    #[serde(default)]
    pub(crate) end_building: Option<String>,
    /// OpenRouteService API key.
    #[arg(long = ARG_ORS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) ors_api_key: Option<String>,
    /// Base URL of the directions service.
    #[arg(long = ARG_ORS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) ors_base_url: Option<String>,
    /// Campus configuration JSON replacing the bundled campus.
    #[arg(long = ARG_CAMPUS_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) campus_config: Option<Utf8PathBuf>,
    /// Seconds allowed for each provider call.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    /// Trip to plan.
    pub(crate) request: RouteRequest,
    /// Credential for the directions service, if it needs one.
    pub(crate) ors_api_key: Option<String>,
    /// Base URL of the directions service.
    pub(crate) ors_base_url: String,
    /// Campus override; `None` uses the bundled campus.
    pub(crate) campus_config: Option<Utf8PathBuf>,
    /// Time allowed for each provider call.
    pub(crate) timeout: Duration,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let start_lat = require(args.start_lat, ARG_START_LAT, ENV_START_LAT)?;
        let start_lon = require(args.start_lon, ARG_START_LON, ENV_START_LON)?;
        let end_lat = require(args.end_lat, ARG_END_LAT, ENV_END_LAT)?;
        let end_lon = require(args.end_lon, ARG_END_LON, ENV_END_LON)?;

        let mut request = RouteRequest::new(
            Coord {
                x: start_lon,
                y: start_lat,
            },
            Coord {
                x: end_lon,
                y: end_lat,
            },
        );
        if let Some(name) = args.start_building {
            request = request.with_start_building(name);
        }
        if let Some(name) = args.end_building {
            request = request.with_end_building(name);
        }

        Ok(Self {
            request,
            ors_api_key: args.ors_api_key,
            ors_base_url: args
                .ors_base_url
                .unwrap_or_else(|| DEFAULT_ORS_BASE_URL.to_owned()),
            campus_config: args.campus_config,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

fn require(value: Option<f64>, field: &'static str, env: &'static str) -> Result<f64, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// Builds the directions provider for the current route invocation.
pub(crate) trait ProviderBuilder {
    fn build(&self, config: &RouteConfig) -> Result<Arc<dyn DirectionsProvider>, CliError>;
}

pub(crate) struct DefaultProviderBuilder;

impl ProviderBuilder for DefaultProviderBuilder {
    fn build(&self, config: &RouteConfig) -> Result<Arc<dyn DirectionsProvider>, CliError> {
        let mut provider_config = HttpDirectionsProviderConfig::new(config.ors_base_url.clone())
            .with_timeout(config.timeout);
        if let Some(key) = &config.ors_api_key {
            provider_config = provider_config.with_api_key(key.clone());
        } else {
            debug!("no directions API key configured");
        }
        let provider = HttpDirectionsProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildDirectionsProvider {
                base_url: config.ors_base_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(provider))
    }
}

pub(crate) async fn run_route_with(
    args: RouteArgs,
    builder: &dyn ProviderBuilder,
    token: &CancellationToken,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_route(&config, builder, token, writer).await
}

pub(crate) async fn execute_route(
    config: &RouteConfig,
    builder: &dyn ProviderBuilder,
    token: &CancellationToken,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let campus = load_campus_graph(config.campus_config.as_deref())?;
    let provider = builder.build(config)?;
    let planner_config = PlannerConfig::default().with_per_profile_timeout(config.timeout);
    let planner = RoutePlanner::with_config(Arc::new(campus), provider, planner_config);

    let plan = planner
        .plan_with_cancellation(&config.request, token)
        .await
        .map_err(|err| match err {
            PlanError::Cancelled => CliError::Interrupted,
            other => CliError::Plan(other),
        })?;
    info!(
        "route answered from {:?} with {} options; failed profiles: {:?}",
        plan.diagnostics.source,
        plan.options.len(),
        plan.diagnostics.failed_profiles
    );
    write_json(writer, &plan.options)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
