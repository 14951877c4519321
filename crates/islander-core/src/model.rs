use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A named, independently toggleable group of map overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Curated place markers.
    Places,
    /// Bus route polylines.
    Bus,
    /// Markers the user added during the session.
    User,
}

impl Layer {
    /// All layers, in chip order.
    pub const ALL: [Layer; 3] = [Layer::Places, Layer::Bus, Layer::User];
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Places => "places",
            Self::Bus => "bus",
            Self::User => "user",
        };
        f.write_str(s)
    }
}

impl FromStr for Layer {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "places" => Ok(Self::Places),
            "bus" => Ok(Self::Bus),
            "user" => Ok(Self::User),
            other => Err(ParseEnumError::new("layer", other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Category of a user-added marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    Food,
    Beach,
    #[default]
    Stay,
}

impl fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Food => "food",
            Self::Beach => "beach",
            Self::Stay => "stay",
        };
        f.write_str(s)
    }
}

impl FromStr for MarkerCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "beach" => Ok(Self::Beach),
            "stay" => Ok(Self::Stay),
            other => Err(ParseEnumError::new("marker category", other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Bot => "bot",
        };
        f.write_str(s)
    }
}

impl FromStr for Sender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "bot" => Ok(Self::Bot),
            other => Err(ParseEnumError::new("sender", other)),
        }
    }
}

/// Error returned when parsing one of the model enums from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Static reference data
// ---------------------------------------------------------------------------

/// A curated point of interest shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Glyph used for the marker icon.
    #[serde(default = "default_place_icon")]
    pub icon: String,
}

fn default_place_icon() -> String {
    "📍".to_string()
}

/// A bus route drawn as a dashed polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    /// Ordered `(lat, lng)` points.
    pub coordinates: Vec<(f64, f64)>,
    /// CSS color, e.g. `#2563eb`.
    pub color: String,
    pub label: String,
}

/// A card on the Places screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedPlace {
    pub name: String,
    pub image_url: String,
}

/// An entry on the Activities screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.icon.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.icon)
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// A point annotation the user added during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMarker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub category: MarkerCategory,
}

/// Visibility of each map layer. One field per [`Layer`], so the set of
/// keys can never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub places: bool,
    pub bus: bool,
    pub user: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            places: true,
            bus: true,
            user: true,
        }
    }
}

impl LayerVisibility {
    pub fn get(&self, layer: Layer) -> bool {
        match layer {
            Layer::Places => self.places,
            Layer::Bus => self.bus,
            Layer::User => self.user,
        }
    }

    pub fn set(&mut self, layer: Layer, on: bool) {
        match layer {
            Layer::Places => self.places = on,
            Layer::Bus => self.bus = on,
            Layer::User => self.user = on,
        }
    }
}

/// One entry of the planner conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}

/// A geocoding candidate the user can pick from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SearchResult {
    /// First comma-separated segment of the display name.
    pub fn title(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Second and third segments of the display name, joined by `,`.
    pub fn subtitle(&self) -> String {
        self.display_name
            .split(',')
            .skip(1)
            .take(2)
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_roundtrips_through_str() {
        for layer in Layer::ALL {
            let parsed: Layer = layer.to_string().parse().unwrap();
            assert_eq!(parsed, layer);
        }
        assert!("roads".parse::<Layer>().is_err());
    }

    #[test]
    fn marker_category_rejects_unknown() {
        let err = "camping".parse::<MarkerCategory>().unwrap_err();
        assert_eq!(err.to_string(), "invalid marker category: \"camping\"");
        assert_eq!("beach".parse::<MarkerCategory>().unwrap(), MarkerCategory::Beach);
    }

    #[test]
    fn layer_visibility_defaults_to_all_on() {
        let vis = LayerVisibility::default();
        assert!(Layer::ALL.iter().all(|l| vis.get(*l)));
    }

    #[test]
    fn layer_visibility_set_touches_only_one_layer() {
        let mut vis = LayerVisibility::default();
        vis.set(Layer::Bus, false);
        assert!(vis.places);
        assert!(!vis.bus);
        assert!(vis.user);
    }

    #[test]
    fn search_result_title_and_subtitle() {
        let r = SearchResult {
            display_name: "Neil Island, South Andaman, Andaman and Nicobar Islands, India"
                .to_string(),
            latitude: 11.83,
            longitude: 93.03,
        };
        assert_eq!(r.title(), "Neil Island");
        assert_eq!(r.subtitle(), " South Andaman, Andaman and Nicobar Islands");
    }

    #[test]
    fn search_result_without_commas() {
        let r = SearchResult {
            display_name: "Havelock".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };
        assert_eq!(r.title(), "Havelock");
        assert_eq!(r.subtitle(), "");
    }

    #[test]
    fn activity_display_appends_icon() {
        let a = Activity {
            name: "Jet Ski".to_string(),
            icon: "🚤".to_string(),
        };
        assert_eq!(a.to_string(), "Jet Ski 🚤");
    }
}
