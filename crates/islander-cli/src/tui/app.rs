//! TUI application state: the four screens and the input routed to them.

use std::time::Duration;

use islander_core::channel::{MapReceiver, MapView};
use islander_core::content::Content;
use islander_core::explore::ExploreController;
use islander_core::model::{ChatMessage, Layer, MarkerCategory, SearchResult};
use islander_core::planner::TripPlannerChat;

/// Which screen the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Planner,
    Places,
    Activities,
    Explore,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Planner, Tab::Places, Tab::Activities, Tab::Explore];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Planner => "Planner",
            Tab::Places => "Places",
            Tab::Activities => "Activities",
            Tab::Explore => "Explore",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Application state for the TUI.
pub struct App {
    pub content: Content,
    pub chat: TripPlannerChat,
    pub explore: ExploreController,
    pub map_view: MapView,
    map_rx: MapReceiver,
    pub current_tab: Tab,
    /// Text being typed on the Planner screen.
    pub chat_input: String,
    pub selected_suggestion: usize,
    pub selected_result: usize,
    pub selected_card: usize,
    pub selected_row: usize,
    /// Category given to markers created from search results.
    pub marker_category: MarkerCategory,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(
        content: Content,
        chat: TripPlannerChat,
        explore: ExploreController,
        map_rx: MapReceiver,
    ) -> Self {
        Self {
            content,
            chat,
            explore,
            map_view: MapView::new(),
            map_rx,
            current_tab: Tab::Planner,
            chat_input: String::new(),
            selected_suggestion: 0,
            selected_result: 0,
            selected_card: 0,
            selected_row: 0,
            marker_category: MarkerCategory::default(),
            tick_rate: Duration::from_millis(100),
            should_quit: false,
            status_message: None,
        }
    }

    /// Apply map commands the renderer has not seen yet.
    pub fn tick(&mut self) {
        self.map_view.pump(&mut self.map_rx);
        let results = self.explore.results().len();
        if self.selected_result >= results && results > 0 {
            self.selected_result = results - 1;
        }
    }

    // -- Navigation --

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
        self.selected_row = 0;
    }

    pub fn prev_tab(&mut self) {
        self.current_tab = self.current_tab.prev();
        self.selected_row = 0;
    }

    pub fn move_up(&mut self) {
        let cursor = match self.current_tab {
            Tab::Planner => &mut self.selected_suggestion,
            Tab::Places | Tab::Activities => &mut self.selected_row,
            Tab::Explore => &mut self.selected_result,
        };
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let (cursor, len) = match self.current_tab {
            Tab::Planner => (
                &mut self.selected_suggestion,
                self.chat.quick_suggestions().len(),
            ),
            Tab::Places => (&mut self.selected_row, self.content.curated.len()),
            Tab::Activities => (&mut self.selected_row, self.content.activities.len()),
            Tab::Explore => (&mut self.selected_result, self.explore.results().len()),
        };
        if len > 0 && *cursor < len - 1 {
            *cursor += 1;
        }
    }

    pub fn move_left(&mut self) {
        if self.current_tab == Tab::Explore {
            self.selected_card = self.selected_card.saturating_sub(1);
        }
    }

    pub fn move_right(&mut self) {
        let len = self.content.places.len();
        if self.current_tab == Tab::Explore && len > 0 && self.selected_card < len - 1 {
            self.selected_card += 1;
        }
    }

    // -- Text input --

    pub fn type_char(&mut self, c: char) {
        match self.current_tab {
            Tab::Planner => self.chat_input.push(c),
            Tab::Explore => {
                let mut query = self.explore.query().to_string();
                query.push(c);
                self.search(query);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.current_tab {
            Tab::Planner => {
                self.chat_input.pop();
            }
            Tab::Explore => {
                let mut query = self.explore.query().to_string();
                if query.pop().is_some() {
                    self.search(query);
                }
            }
            _ => {}
        }
    }

    /// Enter: send the chat input (or the highlighted suggestion while the
    /// conversation is empty), pick a search result, or focus a place card.
    pub fn submit(&mut self) {
        match self.current_tab {
            Tab::Planner => {
                let text = if self.chat_input.trim().is_empty() && self.showing_welcome() {
                    self.chat
                        .quick_suggestions()
                        .get(self.selected_suggestion)
                        .cloned()
                        .unwrap_or_default()
                } else {
                    std::mem::take(&mut self.chat_input)
                };
                self.send_chat(text);
            }
            Tab::Explore => {
                if self.explore.results().is_empty() {
                    self.focus_selected_card();
                } else {
                    self.select_result();
                }
            }
            _ => {}
        }
    }

    // -- Actions --

    /// Send a prompt in the background; the reply shows up on a later tick.
    pub fn send_chat(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        let chat = self.chat.clone();
        tokio::spawn(async move {
            chat.send_prompt(&text).await;
        });
    }

    /// Update the search text and fire a search for it. Searches are not
    /// cancelled; whichever response arrives last is what is shown.
    pub fn search(&mut self, query: String) {
        self.explore.set_query(&query);
        self.selected_result = 0;
        let search = self.explore.search_client().clone();
        tokio::spawn(async move {
            search.search(&query).await;
        });
    }

    pub fn select_result(&mut self) {
        if let Some(marker) = self
            .explore
            .select_result(self.selected_result, self.marker_category)
        {
            self.status_message = Some(format!("Added {}", marker.label));
        }
        self.selected_result = 0;
    }

    pub fn focus_selected_card(&mut self) {
        if let Some(place) = self.content.places.get(self.selected_card) {
            self.explore.focus_place(&place.id);
            self.status_message = Some(format!("Centered on {}", place.name));
        }
    }

    pub fn toggle_layer(&mut self, layer: Layer) {
        let on = self.explore.toggle_layer(layer);
        self.status_message = Some(format!("{layer} layer {}", if on { "on" } else { "off" }));
    }

    pub fn cycle_marker_category(&mut self) {
        self.marker_category = match self.marker_category {
            MarkerCategory::Stay => MarkerCategory::Food,
            MarkerCategory::Food => MarkerCategory::Beach,
            MarkerCategory::Beach => MarkerCategory::Stay,
        };
    }

    // -- Views --

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.chat.messages()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.explore.results()
    }

    /// The planner shows its welcome state until the first message.
    pub fn showing_welcome(&self) -> bool {
        self.chat.messages().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
