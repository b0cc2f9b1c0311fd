//! Campus graph definitions: the bundled data set and on-disk overrides.
//!
//! Definitions are JSON documents matching [`CampusConfig`]. Files are
//! opened through `cap-std` so that the loader only touches the directory
//! that holds the requested file.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::info;
use smartpoi_core::{CampusConfig, CampusConfigError, CampusGraph};
use thiserror::Error;

/// The campus definition shipped with the engine.
///
/// It covers the RV College of Engineering campus road network, its four
/// exits with short connector edges onto the nearest road nodes, and the
/// building names that resolve to graph nodes.
pub const BUNDLED_CAMPUS_JSON: &str = include_str!("../../data/campus.json");

/// Label used in errors about [`BUNDLED_CAMPUS_JSON`].
const BUNDLED_LABEL: &str = "<bundled campus>";

/// Errors raised while loading a campus definition.
#[derive(Debug, Error)]
pub enum CampusLoadError {
    /// The file or its directory could not be opened or read.
    #[error("failed to read campus definition {path}: {source}")]
    Read {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The document is not a valid campus definition.
    #[error("failed to parse campus definition {origin}: {source}")]
    Parse {
        /// File path, or a label for the bundled data.
        origin: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The document parsed but describes an inconsistent graph.
    #[error(transparent)]
    Invalid(#[from] CampusConfigError),
}

/// Parse the bundled campus definition.
///
/// # Errors
///
/// Returns [`CampusLoadError::Parse`] if the bundled document is corrupt.
pub fn bundled_campus_config() -> Result<CampusConfig, CampusLoadError> {
    parse_config(BUNDLED_CAMPUS_JSON, BUNDLED_LABEL)
}

/// Read and parse a campus definition from `path`.
///
/// # Errors
///
/// Returns [`CampusLoadError::Read`] when the file cannot be read and
/// [`CampusLoadError::Parse`] when it is not a campus definition.
pub fn load_campus_config(path: &Utf8Path) -> Result<CampusConfig, CampusLoadError> {
    let text = read_utf8(path).map_err(|source| CampusLoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_config(&text, path.as_str())
}

/// Build the campus graph from `path`, or from the bundled data when no path
/// is given.
///
/// # Errors
///
/// Propagates load failures and graph validation failures.
pub fn load_campus_graph(path: Option<&Utf8Path>) -> Result<CampusGraph, CampusLoadError> {
    let config = match path {
        Some(path) => load_campus_config(path)?,
        None => bundled_campus_config()?,
    };
    let graph = CampusGraph::build(&config)?;
    info!(
        "loaded campus graph from {}: {} nodes, {} edges, {} buildings",
        path.map_or(BUNDLED_LABEL, Utf8Path::as_str),
        graph.node_count(),
        graph.edge_count(),
        graph.building_count()
    );
    Ok(graph)
}

fn parse_config(text: &str, origin: &str) -> Result<CampusConfig, CampusLoadError> {
    serde_json::from_str(text).map_err(|source| CampusLoadError::Parse {
        origin: origin.to_owned(),
        source,
    })
}

/// Read `path` through a capability on its parent directory.
fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("campus definition path should name a file"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

#[cfg(test)]
mod tests;
