//! Error types emitted by the SmartPOI CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use smartpoi_core::PoiSearchError;
use smartpoi_data::CampusLoadError;
use smartpoi_data::routing::ProviderBuildError;
use smartpoi_planner::PlanError;
use thiserror::Error;

/// Errors emitted by the SmartPOI CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The campus configuration could not be loaded.
    #[error(transparent)]
    LoadCampus(#[from] CampusLoadError),
    /// Constructing the directions provider failed.
    #[error("failed to build directions provider for {base_url:?}: {source}")]
    BuildDirectionsProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Route planning failed.
    #[error("route planning failed: {0}")]
    Plan(#[from] PlanError),
    /// The spatial index failed to answer.
    #[error("POI search failed: {0}")]
    Search(#[from] PoiSearchError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The command was interrupted before it finished.
    #[error("interrupted")]
    Interrupted,
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
