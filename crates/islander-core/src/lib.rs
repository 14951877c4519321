//! Core library for the islander trip planner.
//!
//! Everything with behavior lives here: the static content, the
//! marker/layer store, the host-to-renderer map command channel, the
//! geocoding search client and the planner chat client. Front-ends (the
//! TUI and the web map server in `islander-cli`) are thin layers on top.

pub mod channel;
pub mod config;
pub mod content;
pub mod error;
pub mod explore;
pub mod ids;
pub mod map_html;
pub mod markers;
pub mod model;
pub mod planner;
pub mod search;

pub use channel::{MapChannel, MapCommand, MapReceiver, MapSender, MapView};
pub use config::ClientConfig;
pub use content::Content;
pub use error::ClientError;
pub use explore::ExploreController;
pub use markers::{MarkerSnapshot, MarkerStore};
pub use planner::{HttpPlanner, PlannerBackend, TripPlannerChat};
pub use search::{Geocoder, NominatimGeocoder, PlaceSearch};
