//! Marker/layer store: curated places, bus routes, user-added markers and
//! per-layer visibility for one map session.

use crate::content::Content;
use crate::ids::IdGenerator;
use crate::model::{Layer, LayerVisibility, MarkerCategory, Place, RouteSegment, UserMarker};

/// Owned copy of the store's state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSnapshot {
    pub places: Vec<Place>,
    pub routes: Vec<RouteSegment>,
    pub user_markers: Vec<UserMarker>,
    pub visibility: LayerVisibility,
}

/// Holds everything the map shows. User markers live for the session; there
/// is no removal operation.
#[derive(Debug)]
pub struct MarkerStore {
    places: Vec<Place>,
    routes: Vec<RouteSegment>,
    user_markers: Vec<UserMarker>,
    visibility: LayerVisibility,
    ids: IdGenerator,
}

impl MarkerStore {
    /// Create a store seeded with the static places and routes of `content`.
    /// All layers start visible.
    pub fn new(content: &Content) -> Self {
        Self {
            places: content.places.clone(),
            routes: content.routes.clone(),
            user_markers: Vec::new(),
            visibility: LayerVisibility::default(),
            ids: IdGenerator::new(),
        }
    }

    /// Add a user marker. Always succeeds; coordinates are not range-checked.
    pub fn add_user_marker(
        &mut self,
        latitude: f64,
        longitude: f64,
        label: impl Into<String>,
        category: MarkerCategory,
    ) -> UserMarker {
        let marker = UserMarker {
            id: self.ids.next_id(),
            latitude,
            longitude,
            label: label.into(),
            category,
        };
        tracing::debug!(id = %marker.id, label = %marker.label, "user marker added");
        self.user_markers.push(marker.clone());
        marker
    }

    /// Set a layer's visibility. Returns `true` if the value changed.
    pub fn set_layer_visible(&mut self, layer: Layer, on: bool) -> bool {
        let changed = self.visibility.get(layer) != on;
        self.visibility.set(layer, on);
        changed
    }

    /// Flip a layer's visibility and return the new value.
    pub fn toggle_layer(&mut self, layer: Layer) -> bool {
        let on = !self.visibility.get(layer);
        self.visibility.set(layer, on);
        on
    }

    pub fn is_layer_visible(&self, layer: Layer) -> bool {
        self.visibility.get(layer)
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn user_markers(&self) -> &[UserMarker] {
        &self.user_markers
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn snapshot(&self) -> MarkerSnapshot {
        MarkerSnapshot {
            places: self.places.clone(),
            routes: self.routes.clone(),
            user_markers: self.user_markers.clone(),
            visibility: self.visibility,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
