//! Search command implementation for the SmartPOI CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use smartpoi_core::{CategoryFilter, PoiSearch, SearchMode, SearchQuery};
use smartpoi_data::search::{ProcessPoiSearch, ProcessPoiSearchConfig};
use tokio_util::sync::CancellationToken;

use crate::{
    ARG_CATEGORY, ARG_INDEX_BINARY, ARG_INDEX_DIR, ARG_K, ARG_LAT, ARG_LON, ARG_MODE, ARG_QUERY,
    ARG_RADIUS_KM, ARG_TIMEOUT_SECS, CliError, ENV_INDEX_BINARY, ENV_LAT, ENV_LON,
    until_cancelled, write_json,
};

const DEFAULT_RADIUS_KM: f64 = 5.0;
const DEFAULT_NEIGHBOURS: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How the spatial index selects candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModeArg {
    /// Every match within `--radius-km`.
    #[default]
    Radius,
    /// The `--k` nearest matches.
    Knn,
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search the spatial index for points of interest around a \
                 location, either within a radius or as the k nearest \
                 matches, optionally restricted to a category and a text \
                 filter. Results are printed as a JSON array.",
    about = "Search for points of interest"
)]
#[ortho_config(prefix = "SMARTPOI")]
pub(crate) struct SearchArgs {
    /// Latitude of the search centre.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre.
    #[arg(long = ARG_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Category to match, or `all`.
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Search radius in kilometres for `--mode radius`.
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Number of neighbours for `--mode knn`.
    #[arg(long = ARG_K, value_name = "count")]
    #[serde(default)]
    pub(crate) k: Option<u32>,
    /// Candidate selection mode.
    #[arg(long = ARG_MODE, value_enum)]
    #[serde(default)]
    pub(crate) mode: Option<ModeArg>,
    /// Free-text filter on names.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Spatial-index executable.
    #[arg(long = ARG_INDEX_BINARY, value_name = "path")]
    #[serde(default)]
    pub(crate) index_binary: Option<Utf8PathBuf>,
    /// Directory the index runs in.
    #[arg(long = ARG_INDEX_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) index_dir: Option<Utf8PathBuf>,
    /// Seconds allowed for the index to answer.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    /// Query handed to the index.
    pub(crate) query: SearchQuery,
    /// Spatial-index executable.
    pub(crate) index_binary: Utf8PathBuf,
    /// Directory the index runs in.
    pub(crate) index_dir: Option<Utf8PathBuf>,
    /// Time allowed for the index to answer.
    pub(crate) timeout: Duration,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        let index_binary = args.index_binary.ok_or(CliError::MissingArgument {
            field: ARG_INDEX_BINARY,
            env: ENV_INDEX_BINARY,
        })?;

        let mode = match args.mode.unwrap_or_default() {
            ModeArg::Radius => SearchMode::Radius {
                km: args.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            },
            ModeArg::Knn => SearchMode::Nearest {
                k: args.k.unwrap_or(DEFAULT_NEIGHBOURS),
            },
        };
        let category = args
            .category
            .as_deref()
            .map_or(CategoryFilter::All, CategoryFilter::parse);
        let mut query = SearchQuery::new(Coord { x: lon, y: lat }, mode).with_category(category);
        if let Some(text) = args.query {
            query = query.with_text(text);
        }

        Ok(Self {
            query,
            index_binary,
            index_dir: args.index_dir,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// Builds the spatial-index client for the current search invocation.
pub(crate) trait SearchBuilder {
    fn build(&self, config: &SearchConfig) -> Arc<dyn PoiSearch>;
}

pub(crate) struct DefaultSearchBuilder;

impl SearchBuilder for DefaultSearchBuilder {
    fn build(&self, config: &SearchConfig) -> Arc<dyn PoiSearch> {
        let mut process_config = ProcessPoiSearchConfig::new(config.index_binary.as_std_path())
            .with_timeout(config.timeout);
        if let Some(dir) = &config.index_dir {
            process_config = process_config.with_working_dir(dir.as_std_path());
        }
        Arc::new(ProcessPoiSearch::new(process_config))
    }
}

pub(crate) async fn run_search_with(
    args: SearchArgs,
    builder: &dyn SearchBuilder,
    token: &CancellationToken,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_search(&config, builder, token, writer).await
}

pub(crate) async fn execute_search(
    config: &SearchConfig,
    builder: &dyn SearchBuilder,
    token: &CancellationToken,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let index = builder.build(config);
    let records = until_cancelled(token, async {
        index.search(&config.query).await.map_err(CliError::from)
    })
    .await?;
    info!("search returned {} records", records.len());
    write_json(writer, &records)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
