//! Static content providers: map places, bus routes, the curated places
//! list, activities and the planner's quick suggestions.
//!
//! The default content for the Andaman region is defined in `content.toml`
//! and embedded in the binary at compile time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::model::{Activity, CuratedPlace, Place, RouteSegment};

/// All fixed reference data for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Points of interest drawn on the map's `places` layer.
    pub places: Vec<Place>,
    /// Polylines drawn on the map's `bus` layer.
    pub routes: Vec<RouteSegment>,
    /// Cards on the Places screen.
    pub curated: Vec<CuratedPlace>,
    /// Entries on the Activities screen.
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub suggestions: Suggestions,
}

/// Canned prompts offered while the conversation is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub prompts: Vec<String>,
}

/// The embedded content TOML.
static CONTENT_TOML: &str = include_str!("content.toml");

impl Content {
    /// Load the embedded Andaman content.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. If the binary was built and
    /// its tests pass, it is not.
    pub fn load() -> Self {
        Self::from_toml_str(CONTENT_TOML).expect("embedded content.toml is invalid")
    }

    /// Parse and validate content from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ContentError> {
        let content: Content = toml::from_str(s)?;
        content.validate()?;
        Ok(content)
    }

    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for place in &self.places {
            if !seen.insert(place.id.as_str()) {
                return Err(ContentError::DuplicatePlace(place.id.clone()));
            }
        }
        if let Some(route) = self.routes.iter().find(|r| r.coordinates.len() < 2) {
            return Err(ContentError::ShortRoute(route.label.clone()));
        }
        Ok(())
    }

    /// Look up a map place by id.
    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    pub fn quick_suggestions(&self) -> &[String] {
        &self.suggestions.prompts
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_parses() {
        let content = Content::load();
        assert_eq!(content.places.len(), 3);
        assert_eq!(content.routes.len(), 2);
        assert_eq!(content.curated.len(), 5);
        assert_eq!(content.activities.len(), 5);
        assert_eq!(content.quick_suggestions().len(), 3);
    }

    #[test]
    fn embedded_places_have_expected_coordinates() {
        let content = Content::load();
        let pb = content.place("pb").expect("port blair should exist");
        assert_eq!(pb.name, "Port Blair");
        assert_eq!((pb.latitude, pb.longitude), (11.6234, 92.7265));
        assert!(content.place("nope").is_none());
    }

    #[test]
    fn routes_keep_point_order() {
        let content = Content::load();
        let baratang = content
            .routes
            .iter()
            .find(|r| r.label.contains("Baratang"))
            .unwrap();
        assert_eq!(baratang.coordinates.len(), 4);
        assert_eq!(baratang.coordinates[0], (11.6234, 92.7265));
        assert_eq!(baratang.coordinates[3], (11.95, 92.76));
        assert_eq!(baratang.color, "#16a34a");
    }

    #[test]
    fn suggestions_include_beaches_prompt() {
        let content = Content::load();
        assert!(
            content
                .quick_suggestions()
                .iter()
                .any(|s| s == "Best beaches in Andaman")
        );
    }

    #[test]
    fn duplicate_place_ids_are_rejected() {
        let toml = r#"
curated = []
activities = []
routes = []

[[places]]
id = "a"
name = "A"
latitude = 1.0
longitude = 2.0

[[places]]
id = "a"
name = "Also A"
latitude = 3.0
longitude = 4.0
"#;
        let err = Content::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ContentError::DuplicatePlace(id) if id == "a"));
    }

    #[test]
    fn single_point_route_is_rejected() {
        let toml = r##"
places = []
curated = []
activities = []

[[routes]]
label = "stub"
color = "#000"
coordinates = [[1.0, 2.0]]
"##;
        let err = Content::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ContentError::ShortRoute(_)));
    }

    #[test]
    fn missing_icon_falls_back_to_pin() {
        let toml = r#"
routes = []
curated = []
activities = []

[[places]]
id = "x"
name = "X"
latitude = 0.0
longitude = 0.0
"#;
        let content = Content::from_toml_str(toml).unwrap();
        assert_eq!(content.places[0].icon, "📍");
        assert!(content.quick_suggestions().is_empty());
    }
}
