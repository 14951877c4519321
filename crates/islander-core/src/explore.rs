//! Explore screen controller: connects search, the marker store and the
//! map command channel.
//!
//! Every user action that changes what the map shows goes through here, so
//! the store and the renderer see the same sequence of changes.

use crate::channel::{MapCommand, MapSender};
use crate::content::Content;
use crate::markers::MarkerStore;
use crate::model::{Layer, MarkerCategory, SearchResult, UserMarker};
use crate::search::PlaceSearch;

pub struct ExploreController {
    store: MarkerStore,
    search: PlaceSearch,
    map: MapSender,
    query: String,
}

impl ExploreController {
    pub fn new(content: &Content, search: PlaceSearch, map: MapSender) -> Self {
        Self {
            store: MarkerStore::new(content),
            search,
            map,
            query: String::new(),
        }
    }

    /// Record the query text and search for it.
    pub async fn search(&mut self, text: &str) -> Vec<SearchResult> {
        self.set_query(text);
        self.search.search(text).await
    }

    /// Update the query text without searching (the caller runs the search
    /// itself, e.g. in a spawned task via [`Self::search_client`]).
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
    }

    /// Pick the `index`-th current search result: center the map on it, drop
    /// a marker with its title, remember it in the store and close the
    /// result list. Returns `None` if there is no such result.
    pub fn select_result(&mut self, index: usize, category: MarkerCategory) -> Option<UserMarker> {
        let result = self.search.result(index)?;
        let label = result.title().to_string();

        self.map.send(MapCommand::Center {
            lat: result.latitude,
            lng: result.longitude,
        });
        self.map.send(MapCommand::Add {
            lat: result.latitude,
            lng: result.longitude,
            label: label.clone(),
        });

        let marker = self
            .store
            .add_user_marker(result.latitude, result.longitude, label, category);
        self.query = result.display_name;
        self.search.clear();
        Some(marker)
    }

    /// Center the map on a curated place. Returns `false` for unknown ids.
    pub fn focus_place(&self, place_id: &str) -> bool {
        let Some(place) = self.store.places().iter().find(|p| p.id == place_id) else {
            return false;
        };
        self.map.send(MapCommand::Center {
            lat: place.latitude,
            lng: place.longitude,
        });
        true
    }

    /// Flip a layer and tell the renderer. Returns the new visibility.
    pub fn toggle_layer(&mut self, layer: Layer) -> bool {
        let on = self.store.toggle_layer(layer);
        self.map.send(MapCommand::Toggle { layer, on });
        on
    }

    /// Set a layer's visibility; the renderer is only told when it changes.
    pub fn set_layer_visible(&mut self, layer: Layer, on: bool) {
        if self.store.set_layer_visible(layer, on) {
            self.map.send(MapCommand::Toggle { layer, on });
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.search.results()
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    pub fn search_client(&self) -> &PlaceSearch {
        &self.search
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
