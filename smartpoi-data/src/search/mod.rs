//! Spatial-index collaborator adapters.
//!
//! [`ProcessPoiSearch`] runs the index executable once per query, passing
//! the query on the command line and decoding a JSON array of records from
//! standard output.

mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use process::{NULL_QUERY, ProcessPoiSearch, ProcessPoiSearchConfig, index_arguments};
