//! End-to-end tests for the explore screen: search -> select -> map
//! commands, layer toggles, and the headless renderer following along.

use std::sync::Arc;
use std::time::Duration;

use islander_core::channel::{MapChannel, MapCommand, MapView};
use islander_core::content::Content;
use islander_core::explore::ExploreController;
use islander_core::model::{Layer, MarkerCategory};
use islander_core::search::{NominatimGeocoder, PlaceSearch};
use islander_test_utils::{Reply, nominatim_results, spawn_geocoder};

#[tokio::test]
async fn neil_search_select_third_centers_then_adds() {
    let geo = spawn_geocoder(|_| Reply::json(nominatim_results("Neil", 7))).await;
    let geocoder = NominatimGeocoder::new(geo.search_url(), Duration::from_secs(5)).unwrap();
    let search = PlaceSearch::new(Arc::new(geocoder), "Andaman");
    let (tx, mut rx) = MapChannel::new();
    let mut explore = ExploreController::new(&Content::load(), search, tx);

    let candidates = explore.search("Neil").await;
    assert_eq!(candidates.len(), 5);

    let third = candidates[2].clone();
    let marker = explore
        .select_result(2, MarkerCategory::Beach)
        .expect("third result should exist");

    let cmds = rx.drain();
    assert_eq!(
        cmds,
        vec![
            MapCommand::Center {
                lat: third.latitude,
                lng: third.longitude,
            },
            MapCommand::Add {
                lat: third.latitude,
                lng: third.longitude,
                label: "Neil 2".to_string(),
            },
        ]
    );
    assert_eq!((marker.latitude, marker.longitude), (third.latitude, third.longitude));
    assert!(explore.results().is_empty());
    assert_eq!(explore.query(), third.display_name);
}

#[test]
fn bus_toggle_off_then_on_restores_visibility() {
    let geo = NominatimGeocoder::new("http://127.0.0.1:9/search", Duration::from_secs(1)).unwrap();
    let search = PlaceSearch::new(Arc::new(geo), "Andaman");
    let (tx, mut rx) = MapChannel::new();
    let mut explore = ExploreController::new(&Content::load(), search, tx);

    assert!(explore.store().is_layer_visible(Layer::Bus));
    assert!(!explore.toggle_layer(Layer::Bus));
    assert!(explore.toggle_layer(Layer::Bus));
    assert!(explore.store().is_layer_visible(Layer::Bus));

    assert_eq!(
        rx.drain(),
        vec![
            MapCommand::Toggle {
                layer: Layer::Bus,
                on: false,
            },
            MapCommand::Toggle {
                layer: Layer::Bus,
                on: true,
            },
        ]
    );
}

#[tokio::test]
async fn renderer_follows_the_host() {
    let geo = spawn_geocoder(|_| Reply::json(nominatim_results("Ross", 2))).await;
    let geocoder = NominatimGeocoder::new(geo.search_url(), Duration::from_secs(5)).unwrap();
    let search = PlaceSearch::new(Arc::new(geocoder), "Andaman");
    let (tx, mut rx) = MapChannel::new();
    let mut explore = ExploreController::new(&Content::load(), search, tx);
    let mut view = MapView::new();

    explore.search("Ross").await;
    explore.select_result(1, MarkerCategory::Stay);
    explore.toggle_layer(Layer::Places);
    assert!(explore.focus_place("pb"));
    view.pump(&mut rx);

    assert_eq!(view.center, (11.6234, 92.7265));
    assert_eq!(view.open_popup_label(), Some("Ross 1"));
    assert!(!view.layers.places);
    assert_eq!(view.layers, explore.store().visibility());
}

#[test]
fn commands_before_renderer_attaches_are_lost() {
    let geo = NominatimGeocoder::new("http://127.0.0.1:9/search", Duration::from_secs(1)).unwrap();
    let search = PlaceSearch::new(Arc::new(geo), "Andaman");
    let (tx, rx) = MapChannel::new();
    drop(rx);
    let mut explore = ExploreController::new(&Content::load(), search, tx);

    // The store still changes; only the renderer misses out.
    assert!(!explore.toggle_layer(Layer::User));
    assert!(!explore.store().is_layer_visible(Layer::User));
}
