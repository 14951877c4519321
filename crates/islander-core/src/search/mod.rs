//! Place search: turns free text into at most five selectable map
//! candidates using an external geocoding service.
//!
//! # Policy
//!
//! - Queries shorter than [`MIN_QUERY_CHARS`] clear the results and never
//!   reach the network.
//! - Every other query is sent as-is with the region hint appended.
//! - Responses are applied in arrival order. A slow earlier request can
//!   overwrite the results of a later one; nothing is cancelled.
//! - Failures are logged and swallowed. The previous results stay put.

pub mod nominatim;

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ClientError;
use crate::model::SearchResult;

pub use nominatim::NominatimGeocoder;

/// Queries with fewer characters than this are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// At most this many candidates are kept from a response.
pub const MAX_RESULTS: usize = 5;

/// Adapter interface for a geocoding service.
///
/// Object-safe so it can be shared as `Arc<dyn Geocoder>`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Human-readable name for logs (e.g. "nominatim").
    fn name(&self) -> &str;

    /// Resolve the fully formed query text into candidates, in the order
    /// the service ranked them.
    async fn geocode(&self, query: &str) -> Result<Vec<SearchResult>, ClientError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Geocoder) {}
};

/// Search client holding the current candidate list.
///
/// Clones share the same result list, so a clone can be moved into a
/// spawned task while the UI keeps reading [`PlaceSearch::results`].
#[derive(Clone)]
pub struct PlaceSearch {
    geocoder: Arc<dyn Geocoder>,
    region_hint: String,
    results: Arc<Mutex<Vec<SearchResult>>>,
}

impl PlaceSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>, region_hint: impl Into<String>) -> Self {
        Self {
            geocoder,
            region_hint: region_hint.into(),
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run a search and return the resulting candidate list.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.chars().count() < MIN_QUERY_CHARS {
            self.clear();
            return Vec::new();
        }

        let text = self.scoped_query(query);
        match self.geocoder.geocode(&text).await {
            Ok(mut found) => {
                found.truncate(MAX_RESULTS);
                tracing::debug!(
                    geocoder = self.geocoder.name(),
                    query = %text,
                    results = found.len(),
                    "search results"
                );
                *self.lock() = found.clone();
                found
            }
            Err(e) => {
                tracing::warn!(
                    geocoder = self.geocoder.name(),
                    query = %text,
                    error = %e,
                    "search failed; keeping previous results"
                );
                self.results()
            }
        }
    }

    /// The current candidates.
    pub fn results(&self) -> Vec<SearchResult> {
        self.lock().clone()
    }

    /// The candidate at `index`, if present.
    pub fn result(&self, index: usize) -> Option<SearchResult> {
        self.lock().get(index).cloned()
    }

    /// Discard the current candidates.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn scoped_query(&self, query: &str) -> String {
        if self.region_hint.is_empty() {
            query.to_string()
        } else {
            format!("{query} {}", self.region_hint)
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SearchResult>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PlaceSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceSearch")
            .field("geocoder", &self.geocoder.name())
            .field("region_hint", &self.region_hint)
            .field("results", &self.lock().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Geocoder that replays scripted outcomes and records queries.
    struct ScriptedGeocoder {
        outcomes: Mutex<VecDeque<Result<Vec<SearchResult>, ClientError>>>,
        queries: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedGeocoder {
        fn new(outcomes: Vec<Result<Vec<SearchResult>, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn geocode(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn candidates(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                display_name: format!("Spot {i}, South Andaman, India"),
                latitude: 11.0 + i as f64 / 10.0,
                longitude: 92.0 + i as f64 / 10.0,
            })
            .collect()
    }

    #[tokio::test]
    async fn short_queries_never_reach_the_geocoder() {
        let geo = ScriptedGeocoder::new(vec![]);
        let search = PlaceSearch::new(geo.clone(), "Andaman");
        for q in ["", "N", "Ne", "ñé"] {
            assert!(search.search(q).await.is_empty());
        }
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn region_hint_is_appended() {
        let geo = ScriptedGeocoder::new(vec![Ok(candidates(1))]);
        let search = PlaceSearch::new(geo.clone(), "Andaman");
        search.search("Neil").await;
        assert_eq!(*geo.queries.lock().unwrap(), vec!["Neil Andaman".to_string()]);
    }

    #[tokio::test]
    async fn results_are_truncated_to_five_in_order() {
        let geo = ScriptedGeocoder::new(vec![Ok(candidates(7)), Ok(candidates(2))]);
        let search = PlaceSearch::new(geo, "Andaman");

        let first = search.search("Neil").await;
        assert_eq!(first, candidates(7)[..5].to_vec());
        assert_eq!(search.results(), first);

        let second = search.search("Havelock").await;
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn failure_keeps_previous_results() {
        let geo = ScriptedGeocoder::new(vec![
            Ok(candidates(3)),
            Err(ClientError::decode("http://geo", "not json")),
        ]);
        let search = PlaceSearch::new(geo, "Andaman");

        search.search("Ross").await;
        let after_failure = search.search("Ross Island").await;
        assert_eq!(after_failure, candidates(3));
        assert_eq!(search.results(), candidates(3));
    }

    #[tokio::test]
    async fn short_query_clears_previous_results() {
        let geo = ScriptedGeocoder::new(vec![Ok(candidates(3))]);
        let search = PlaceSearch::new(geo, "Andaman");
        search.search("Ross").await;
        assert_eq!(search.results().len(), 3);

        search.search("Ro").await;
        assert!(search.results().is_empty());
    }

    #[tokio::test]
    async fn clones_share_results() {
        let geo = ScriptedGeocoder::new(vec![Ok(candidates(2))]);
        let search = PlaceSearch::new(geo, "");
        let worker = search.clone();
        tokio::spawn(async move { worker.search("Baratang").await })
            .await
            .unwrap();
        assert_eq!(search.results().len(), 2);
        assert_eq!(search.result(1), Some(candidates(2)[1].clone()));
        assert_eq!(search.result(2), None);
    }
}
