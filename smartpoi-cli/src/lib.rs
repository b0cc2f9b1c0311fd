//! Command-line interface for the SmartPOI route-planning engine.
#![forbid(unsafe_code)]

use std::future::Future;
use std::io::Write;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

mod error;
mod route;
mod search;

pub use error::CliError;

use route::RouteArgs;
use search::SearchArgs;

pub(crate) const ARG_START_LAT: &str = "start-lat";
pub(crate) const ARG_START_LON: &str = "start-lon";
pub(crate) const ARG_END_LAT: &str = "end-lat";
pub(crate) const ARG_END_LON: &str = "end-lon";
pub(crate) const ARG_START_BUILDING: &str = "start-building";
pub(crate) const ARG_END_BUILDING: &str = "end-building";
pub(crate) const ARG_ORS_API_KEY: &str = "ors-api-key";
pub(crate) const ARG_ORS_BASE_URL: &str = "ors-base-url";
pub(crate) const ARG_CAMPUS_CONFIG: &str = "campus-config";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_START_LAT: &str = "SMARTPOI_CMDS_ROUTE_START_LAT";
pub(crate) const ENV_START_LON: &str = "SMARTPOI_CMDS_ROUTE_START_LON";
pub(crate) const ENV_END_LAT: &str = "SMARTPOI_CMDS_ROUTE_END_LAT";
pub(crate) const ENV_END_LON: &str = "SMARTPOI_CMDS_ROUTE_END_LON";

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_RADIUS_KM: &str = "radius-km";
pub(crate) const ARG_K: &str = "k";
pub(crate) const ARG_MODE: &str = "mode";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_INDEX_BINARY: &str = "index-binary";
pub(crate) const ARG_INDEX_DIR: &str = "index-dir";
pub(crate) const ENV_LAT: &str = "SMARTPOI_CMDS_SEARCH_LAT";
pub(crate) const ENV_LON: &str = "SMARTPOI_CMDS_SEARCH_LON";
pub(crate) const ENV_INDEX_BINARY: &str = "SMARTPOI_CMDS_SEARCH_INDEX_BINARY";

/// Run the SmartPOI CLI with the current process arguments and environment.
///
/// Ctrl-C abandons the running command: in-flight provider calls are dropped
/// and a spawned spatial-index process is killed.
///
/// # Errors
///
/// Returns a [`CliError`] describing why the command failed.
pub fn run() -> Result<(), CliError> {
    let Some(cli) = parse_cli(std::env::args_os())? else {
        return Ok(());
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async move {
        let token = CancellationToken::new();
        let interrupt = tokio::spawn(cancel_on_ctrl_c(token.clone()));
        let mut stdout = std::io::stdout().lock();
        let outcome = match cli.command {
            Command::Route(args) => {
                route::run_route_with(args, &route::DefaultProviderBuilder, &token, &mut stdout)
                    .await
            }
            Command::Search(args) => {
                search::run_search_with(args, &search::DefaultSearchBuilder, &token, &mut stdout)
                    .await
            }
        };
        interrupt.abort();
        outcome
    })
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::warn!("interrupt received, cancelling");
        token.cancel();
    }
}

/// Await `work` unless `token` fires first.
pub(crate) async fn until_cancelled<T>(
    token: &CancellationToken,
    work: impl Future<Output = Result<T, CliError>>,
) -> Result<T, CliError> {
    tokio::select! {
        biased;
        () = token.cancelled() => Err(CliError::Interrupted),
        outcome = work => outcome,
    }
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "smartpoi",
    about = "Campus-aware route planning and point-of-interest search",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a trip and print the route options ranked by emissions.
    Route(RouteArgs),
    /// Query the spatial index for points of interest.
    Search(SearchArgs),
}

/// Parse `args`, printing help or version text and yielding `None` when
/// either was requested.
fn parse_cli<I, T>(args: I) -> Result<Option<Cli>, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) if is_informational(&err) => {
            err.print().map_err(CliError::WriteOutput)?;
            Ok(None)
        }
        Err(err) => Err(CliError::ArgumentParsing(err)),
    }
}

/// Whether clap stopped parsing to show help or version text.
fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

#[cfg(test)]
mod tests;
