//! Map command channel: a one-way, fire-and-forget message queue from the
//! host UI to the map renderer.
//!
//! ```text
//! ExploreController --MapSender::send(cmd)--> [unbounded queue] --> MapReceiver
//!                                                                      |
//!                                                   MapView::apply / web map
//! ```
//!
//! There is no acknowledgement and no way back. Commands sent while no
//! renderer is attached (the receiver was dropped) are lost, not retried.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::model::{Layer, LayerVisibility};

/// Zoom level the renderer uses when recentering.
pub const CENTER_ZOOM: u8 = 10;

/// Initial viewport center, roughly the middle of the archipelago.
pub const INITIAL_CENTER: (f64, f64) = (11.9, 92.9);

/// Initial zoom level.
pub const INITIAL_ZOOM: u8 = 7;

/// Popup text the renderer uses when an `ADD` arrives without a label.
pub const DEFAULT_MARKER_LABEL: &str = "Place";

/// A command understood by the map renderer.
///
/// Serialized as JSON with a `type` discriminator, e.g.
/// `{"type":"CENTER","lat":11.6,"lng":92.7}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum MapCommand {
    /// Recenter the viewport on a coordinate (animated).
    Center { lat: f64, lng: f64 },
    /// Add a user marker and open its popup.
    Add {
        lat: f64,
        lng: f64,
        #[serde(default = "default_label")]
        label: String,
    },
    /// Show or hide a layer group.
    Toggle { layer: Layer, on: bool },
}

fn default_label() -> String {
    DEFAULT_MARKER_LABEL.to_string()
}

impl MapCommand {
    /// Encode to the wire form posted to the embedded web map.
    pub fn to_json(&self) -> String {
        // Serializing plain numbers, strings and enums cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Constructor for a sender/receiver pair.
pub struct MapChannel;

impl MapChannel {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (MapSender, MapReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (MapSender { tx }, MapReceiver { rx })
    }
}

/// Host side of the channel. Cheap to clone; there is normally one owner.
#[derive(Debug, Clone)]
pub struct MapSender {
    tx: mpsc::UnboundedSender<MapCommand>,
}

impl MapSender {
    /// Queue a command for the renderer. Never blocks and never fails; if
    /// no renderer is attached the command is dropped.
    pub fn send(&self, cmd: MapCommand) {
        tracing::debug!(command = %cmd.to_json(), "map command");
        if let Err(mpsc::error::SendError(cmd)) = self.tx.send(cmd) {
            tracing::debug!(command = ?cmd, "map renderer not attached; command dropped");
        }
    }

    /// Whether a renderer is still listening.
    pub fn is_attached(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Renderer side of the channel.
#[derive(Debug)]
pub struct MapReceiver {
    rx: mpsc::UnboundedReceiver<MapCommand>,
}

impl MapReceiver {
    /// Wait for the next command. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<MapCommand> {
        self.rx.recv().await
    }

    /// Take the next command if one is already queued.
    pub fn try_recv(&mut self) -> Option<MapCommand> {
        self.rx.try_recv().ok()
    }

    /// Take every command currently queued, in send order.
    pub fn drain(&mut self) -> Vec<MapCommand> {
        let mut out = Vec::new();
        while let Some(cmd) = self.try_recv() {
            out.push(cmd);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Headless renderer model
// ---------------------------------------------------------------------------

/// A marker the renderer has drawn in response to an `ADD`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarker {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

/// What the renderer is currently showing. Driven only by [`MapCommand`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<RenderedMarker>,
    /// Index into `markers` of the popup that is open, if any.
    pub open_popup: Option<usize>,
    pub layers: LayerVisibility,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
            markers: Vec::new(),
            open_popup: None,
            layers: LayerVisibility::default(),
        }
    }
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, cmd: MapCommand) {
        match cmd {
            MapCommand::Center { lat, lng } => {
                self.center = (lat, lng);
                self.zoom = CENTER_ZOOM;
            }
            MapCommand::Add { lat, lng, label } => {
                self.markers.push(RenderedMarker { lat, lng, label });
                self.open_popup = Some(self.markers.len() - 1);
            }
            MapCommand::Toggle { layer, on } => self.layers.set(layer, on),
        }
    }

    /// Apply every queued command. Returns how many were applied.
    pub fn pump(&mut self, rx: &mut MapReceiver) -> usize {
        let cmds = rx.drain();
        let n = cmds.len();
        for cmd in cmds {
            self.apply(cmd);
        }
        n
    }

    pub fn open_popup_label(&self) -> Option<&str> {
        self.open_popup
            .and_then(|i| self.markers.get(i))
            .map(|m| m.label.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
