//! The embedded web map: a self-contained Leaflet page that draws the
//! static layers and obeys [`MapCommand`](crate::channel::MapCommand)s
//! posted to it as JSON strings.

use serde::Serialize;

use crate::channel::{CENTER_ZOOM, DEFAULT_MARKER_LABEL, INITIAL_CENTER, INITIAL_ZOOM};
use crate::content::Content;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body, #map { height: 100%; margin: 0; padding: 0; }
.marker { font-size: 26px; transform: translate(-50%, -50%); }
</style>
</head>
<body>
<div id="map"></div>
<script>
const PLACES = __PLACES__;
const ROUTES = __ROUTES__;
const map = L.map("map").setView(__CENTER__, __ZOOM__);

L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", { maxZoom: 19 }).addTo(map);

function icon(glyph) {
  return L.divIcon({ html: "<div class='marker'>" + glyph + "</div>", className: "", iconSize: [30, 30] });
}

const layers = {
  places: L.layerGroup().addTo(map),
  bus: L.layerGroup().addTo(map),
  user: L.layerGroup().addTo(map),
};

for (const p of PLACES) {
  L.marker([p.latitude, p.longitude], { icon: icon(p.icon) }).addTo(layers.places).bindPopup(p.name);
}

for (const r of ROUTES) {
  L.polyline(r.coordinates, { color: r.color, weight: 5, dashArray: "8,6" })
    .addTo(layers.bus).bindPopup("🚌 " + r.label);
}

function handle(raw) {
  const d = JSON.parse(raw);
  if (d.type === "CENTER") {
    map.setView([d.lat, d.lng], __CENTER_ZOOM__, { animate: true });
  } else if (d.type === "ADD") {
    L.marker([d.lat, d.lng], { icon: icon("⭐") })
      .addTo(layers.user)
      .bindPopup(d.label || "__DEFAULT_LABEL__")
      .openPopup();
  } else if (d.type === "TOGGLE") {
    const layer = layers[d.layer];
    if (layer) { d.on ? map.addLayer(layer) : map.removeLayer(layer); }
  }
}

document.addEventListener("message", function (e) { handle(e.data); });
window.addEventListener("message", function (e) { handle(e.data); });
</script>
</body>
</html>
"#;

/// Render the map page for `content`.
///
/// Content JSON is spliced in after every fixed placeholder is filled, and
/// never scanned again, so names and labels are emitted verbatim.
pub fn map_html(content: &Content) -> String {
    let page = TEMPLATE
        .replace(
            "__CENTER__",
            &format!("[{}, {}]", INITIAL_CENTER.0, INITIAL_CENTER.1),
        )
        .replace("__CENTER_ZOOM__", &CENTER_ZOOM.to_string())
        .replace("__ZOOM__", &INITIAL_ZOOM.to_string())
        .replace("__DEFAULT_LABEL__", DEFAULT_MARKER_LABEL);

    // `__PLACES__` precedes `__ROUTES__` in the template.
    let Some((head, tail)) = page.split_once("__PLACES__") else {
        return page;
    };
    let Some((middle, rest)) = tail.split_once("__ROUTES__") else {
        return page;
    };
    format!(
        "{head}{}{middle}{}{rest}",
        script_json(&content.places),
        script_json(&content.routes)
    )
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_embeds_places_and_routes() {
        let html = map_html(&Content::load());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("\"Port Blair\""));
        assert!(html.contains("#16a34a"));
        assert!(html.contains("setView([11.9, 92.9], 7)"));
        assert!(!html.contains("__"), "unreplaced placeholder left in page");
    }

    #[test]
    fn page_handles_all_three_commands() {
        let html = map_html(&Content::load());
        for kind in ["\"CENTER\"", "\"ADD\"", "\"TOGGLE\""] {
            assert!(html.contains(kind), "missing handler for {kind}");
        }
    }

    #[test]
    fn placeholder_text_in_content_is_left_alone() {
        let mut content = Content::load();
        content.places[0].name = "__ZOOM__ and __ROUTES__".to_string();
        content.routes[0].label = "__PLACES__ via __CENTER__".to_string();

        let html = map_html(&content);
        assert!(html.contains("\"__ZOOM__ and __ROUTES__\""));
        assert!(html.contains("\"__PLACES__ via __CENTER__\""));
        assert!(html.contains("setView([11.9, 92.9], 7)"));
    }

    #[test]
    fn script_json_escapes_closing_tags() {
        let out = script_json(&vec!["</script><b>"]);
        assert!(!out.contains("</script>"));
        assert!(out.contains("<\\/script>"));
    }
}
