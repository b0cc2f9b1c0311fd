//! Test utilities for spatial-index adapters.
//!
//! [`StubPoiSearch`] answers every query from a fixed record list or a
//! fixed failure and remembers the queries it received.

use std::sync::Mutex;

use async_trait::async_trait;
use smartpoi_core::{PoiRecord, PoiSearch, PoiSearchError, SearchQuery};

/// Stub `PoiSearch` for testing.
///
/// Queries are validated exactly as the process adapter validates them, so
/// invalid input fails before the stub's configured answer is consulted.
#[derive(Debug, Default)]
pub struct StubPoiSearch {
    outcome: StubOutcome,
    queries: Mutex<Vec<SearchQuery>>,
}

#[derive(Debug, Clone)]
enum StubOutcome {
    Records(Vec<PoiRecord>),
    NonZeroExit { status: String, stderr: String },
    Timeout { timeout_secs: u64 },
    Malformed { message: String },
}

impl Default for StubOutcome {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

impl StubPoiSearch {
    /// Answer every query with `records`.
    #[must_use]
    pub fn with_records(records: Vec<PoiRecord>) -> Self {
        Self {
            outcome: StubOutcome::Records(records),
            ..Self::default()
        }
    }

    /// Fail every query as if the index exited unsuccessfully.
    #[must_use]
    pub fn exiting_with(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            outcome: StubOutcome::NonZeroExit {
                status: status.into(),
                stderr: stderr.into(),
            },
            ..Self::default()
        }
    }

    /// Fail every query with a timeout.
    #[must_use]
    pub fn timing_out(timeout_secs: u64) -> Self {
        Self {
            outcome: StubOutcome::Timeout { timeout_secs },
            ..Self::default()
        }
    }

    /// Fail every query as if the index printed garbage.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            outcome: StubOutcome::Malformed {
                message: message.into(),
            },
            ..Self::default()
        }
    }

    /// Queries received so far, in arrival order.
    #[must_use]
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PoiSearch for StubPoiSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PoiRecord>, PoiSearchError> {
        query.validate()?;
        if let Ok(mut guard) = self.queries.lock() {
            guard.push(query.clone());
        }
        match &self.outcome {
            StubOutcome::Records(records) => Ok(records.clone()),
            StubOutcome::NonZeroExit { status, stderr } => Err(PoiSearchError::NonZeroExit {
                status: status.clone(),
                stderr: stderr.clone(),
            }),
            StubOutcome::Timeout { timeout_secs } => Err(PoiSearchError::Timeout {
                timeout_secs: *timeout_secs,
            }),
            StubOutcome::Malformed { message } => Err(PoiSearchError::MalformedOutput {
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use smartpoi_core::SearchMode;

    fn query() -> SearchQuery {
        SearchQuery::new(Coord { x: 77.5, y: 12.92 }, SearchMode::Nearest { k: 2 })
    }

    #[tokio::test]
    async fn records_queries_and_answers() {
        let record = PoiRecord {
            id: 1,
            name: "Library".to_owned(),
            category: "education".to_owned(),
            lat: 12.923,
            lon: 77.5,
            distance_km: None,
        };
        let stub = StubPoiSearch::with_records(vec![record.clone()]);

        let found = stub.search(&query()).await.expect("should succeed");

        assert_eq!(found, vec![record]);
        assert_eq!(stub.queries(), vec![query()]);
    }

    #[tokio::test]
    async fn configured_failure_is_returned() {
        let stub = StubPoiSearch::exiting_with("exit status: 1", "cannot open pois.csv");

        let err = stub.search(&query()).await.expect_err("should fail");

        assert!(matches!(err, PoiSearchError::NonZeroExit { .. }));
    }
}
