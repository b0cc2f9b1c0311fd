//! `PoiSearch` implemented by spawning the spatial-index executable.
//!
//! The executable takes six positional arguments:
//!
//! ```text
//! <lat> <lon> <category|all> <radius_km|k> <text|NULL_QUERY> <radius|knn>
//! ```
//!
//! and prints a JSON array of `{id, name, type, lat, lon}` objects.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use smartpoi_core::{PoiRecord, PoiSearch, PoiSearchError, SearchMode, SearchQuery};
use tokio::process::Command;

/// Placeholder passed in the text position when no text filter is set.
pub const NULL_QUERY: &str = "NULL_QUERY";

/// Default time allowed for one index invocation, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`ProcessPoiSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPoiSearchConfig {
    /// Index executable.
    pub program: PathBuf,
    /// Directory the index runs in; it reads its data files from there.
    pub working_dir: Option<PathBuf>,
    /// Time allowed before the child is killed.
    pub timeout: Duration,
}

impl ProcessPoiSearchConfig {
    /// Configure the given executable with the default timeout.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Run the index from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the per-invocation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Spatial index reached through a child process per query.
///
/// The child is killed if the timeout elapses or the calling future is
/// dropped, so an abandoned search never outlives its request.
#[derive(Debug, Clone)]
pub struct ProcessPoiSearch {
    config: ProcessPoiSearchConfig,
}

impl ProcessPoiSearch {
    /// Create a search adapter.
    #[must_use]
    pub fn new(config: ProcessPoiSearchConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ProcessPoiSearchConfig {
        &self.config
    }

    fn command(&self, query: &SearchQuery) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(index_arguments(query))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

/// Positional arguments understood by the index executable.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use smartpoi_core::{SearchMode, SearchQuery};
/// use smartpoi_data::search::index_arguments;
///
/// let query = SearchQuery::new(Coord { x: 77.5, y: 12.92 }, SearchMode::Radius { km: 2.5 });
/// assert_eq!(
///     index_arguments(&query),
///     ["12.92", "77.5", "all", "2.5", "NULL_QUERY", "radius"]
/// );
/// ```
#[must_use]
pub fn index_arguments(query: &SearchQuery) -> Vec<String> {
    let (value, mode) = match query.mode {
        SearchMode::Radius { km } => (km.to_string(), "radius"),
        SearchMode::Nearest { k } => (k.to_string(), "knn"),
    };
    vec![
        query.location.y.to_string(),
        query.location.x.to_string(),
        query.category.to_string(),
        value,
        query.text.clone().unwrap_or_else(|| NULL_QUERY.to_owned()),
        mode.to_owned(),
    ]
}

/// Decode the index's standard output.
///
/// Empty output is treated as malformed: a working index always prints an
/// array, even when nothing matches.
fn parse_records(stdout: &[u8]) -> Result<Vec<PoiRecord>, PoiSearchError> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PoiSearchError::MalformedOutput {
            message: "empty output".to_owned(),
        });
    }
    serde_json::from_str(trimmed).map_err(|err| PoiSearchError::MalformedOutput {
        message: err.to_string(),
    })
}

#[async_trait]
impl PoiSearch for ProcessPoiSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PoiRecord>, PoiSearchError> {
        query.validate()?;

        let child = self
            .command(query)
            .spawn()
            .map_err(|source| PoiSearchError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!(
                    "spatial index {:?} killed after {:?}",
                    self.config.program, self.config.timeout
                );
                PoiSearchError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            })?
            .map_err(|source| PoiSearchError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PoiSearchError::NonZeroExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let records = parse_records(&output.stdout)?;
        debug!("spatial index returned {} records", records.len());
        Ok(records)
    }
}
