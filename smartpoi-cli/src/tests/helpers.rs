//! Test helpers shared by the route and search command tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use smartpoi_core::{DirectionsProvider, PoiSearch};
use smartpoi_data::routing::test_support::StubDirectionsProvider;
use smartpoi_data::search::test_support::StubPoiSearch;
use tempfile::TempDir;

use crate::CliError;
use crate::route::{ProviderBuilder, RouteConfig};
use crate::search::{SearchBuilder, SearchConfig};

/// Hands out a shared stub so tests can inspect it afterwards.
pub(super) struct StubProviderBuilder {
    pub(super) provider: Arc<StubDirectionsProvider>,
}

impl ProviderBuilder for StubProviderBuilder {
    fn build(&self, _config: &RouteConfig) -> Result<Arc<dyn DirectionsProvider>, CliError> {
        Ok(self.provider.clone())
    }
}

pub(super) struct StubSearchBuilder {
    pub(super) search: Arc<StubPoiSearch>,
}

impl SearchBuilder for StubSearchBuilder {
    fn build(&self, _config: &SearchConfig) -> Arc<dyn PoiSearch> {
        self.search.clone()
    }
}

/// Write `contents` to `name` inside `dir`, returning the UTF-8 path.
pub(super) fn write_utf8(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    Utf8PathBuf::from_path_buf(path).expect("temp paths are UTF-8")
}
