//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use islander_core::model::{Layer, Sender};

use super::app::{App, Tab};

/// Render the current tab.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Planner => render_planner(f, app, chunks[1]),
        Tab::Places => render_places(f, app, chunks[1]),
        Tab::Activities => render_activities(f, app, chunks[1]),
        Tab::Explore => render_explore(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.current_tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Andaman Trip Planner "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

fn render_planner(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if app.showing_welcome() {
        lines.push(Line::from(Span::styled(
            "Plan your trip in seconds",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for (i, prompt) in app.chat.quick_suggestions().iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("  {prompt}"),
                highlight(i == app.selected_suggestion),
            )));
        }
    } else {
        for msg in app.messages() {
            let (who, color) = match msg.sender {
                Sender::User => ("you", Color::Cyan),
                Sender::Bot => ("planner", Color::Green),
            };
            lines.push(Line::from(Span::styled(
                format!("{who}:"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for text_line in msg.text.lines() {
                lines.push(Line::from(format!("  {text_line}")));
            }
        }
    }
    if app.chat.is_busy() {
        lines.push(Line::from(Span::styled(
            "planner is thinking...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Trip Planner "));
    f.render_widget(log, chunks[0]);

    let input = Paragraph::new(app.chat_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ask about your trip "),
    );
    f.render_widget(input, chunks[1]);
}

// ---------------------------------------------------------------------------
// Places / Activities
// ---------------------------------------------------------------------------

fn render_places(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .content
        .curated
        .iter()
        .enumerate()
        .flat_map(|(i, place)| {
            [
                Line::from(Span::styled(
                    place.name.clone(),
                    highlight(i == app.selected_row).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", place.image_url),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Popular Places "),
    );
    f.render_widget(list, area);
}

fn render_activities(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .content
        .activities
        .iter()
        .enumerate()
        .map(|(i, activity)| {
            Line::from(Span::styled(
                activity.to_string(),
                highlight(i == app.selected_row),
            ))
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Activities "),
    );
    f.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Explore
// ---------------------------------------------------------------------------

fn render_explore(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Min(3),    // results
            Constraint::Length(3), // layer chips
            Constraint::Length(3), // place cards
        ])
        .split(columns[0]);

    let search = Paragraph::new(app.explore.query()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search places "),
    );
    f.render_widget(search, left[0]);

    render_results(f, app, left[1]);
    render_layer_chips(f, app, left[2]);
    render_place_cards(f, app, left[3]);
    render_map(f, app, columns[1]);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let results = app.results();
    let lines: Vec<Line> = if results.is_empty() {
        vec![Line::from(Span::styled(
            "Type at least 3 characters to search",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        results
            .iter()
            .enumerate()
            .flat_map(|(i, r)| {
                [
                    Line::from(Span::styled(
                        r.title().to_string(),
                        highlight(i == app.selected_result).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", r.subtitle()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(format!(
        " Results (new markers: {}) ",
        app.marker_category
    ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_layer_chips(f: &mut Frame, app: &App, area: Rect) {
    let visibility = app.explore.store().visibility();
    let mut spans = Vec::new();
    for (i, layer) in Layer::ALL.iter().enumerate() {
        let on = visibility.get(*layer);
        let style = if on {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" F{} {layer} ", i + 1), style));
        spans.push(Span::raw(" "));
    }
    let chips =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" Layers "));
    f.render_widget(chips, area);
}

fn render_place_cards(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, place) in app.content.places.iter().enumerate() {
        spans.push(Span::styled(
            format!(" {} {} ", place.icon, place.name),
            highlight(i == app.selected_card),
        ));
    }
    let cards =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" Places "));
    f.render_widget(cards, area);
}

/// Degrees of longitude visible at `zoom`, web-mercator style.
fn lng_span(zoom: u8) -> f64 {
    360.0 / f64::from(1u32 << zoom.min(20))
}

fn render_map(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.map_view;
    let (lat, lng) = view.center;
    let half_lng = lng_span(view.zoom) / 2.0;
    let half_lat = half_lng / 2.0;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Map ({lat:.3}, {lng:.3}) z{} ",
            view.zoom
        )))
        .x_bounds([lng - half_lng, lng + half_lng])
        .y_bounds([lat - half_lat, lat + half_lat])
        .paint(|ctx| {
            if view.layers.bus {
                for route in &app.content.routes {
                    let color = route_color(&route.color);
                    for pair in route.coordinates.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0].1,
                            y1: pair[0].0,
                            x2: pair[1].1,
                            y2: pair[1].0,
                            color,
                        });
                    }
                }
            }
            if view.layers.places {
                for place in &app.content.places {
                    ctx.print(
                        place.longitude,
                        place.latitude,
                        Span::styled(
                            format!("{} {}", place.icon, place.name),
                            Style::default().fg(Color::Yellow),
                        ),
                    );
                }
            }
            if view.layers.user {
                for (i, marker) in view.markers.iter().enumerate() {
                    let text = if view.open_popup == Some(i) {
                        format!("● {}", marker.label)
                    } else {
                        "●".to_string()
                    };
                    ctx.print(
                        marker.lng,
                        marker.lat,
                        Span::styled(text, Style::default().fg(Color::Magenta)),
                    );
                }
            }
        });
    f.render_widget(canvas, area);
}

fn route_color(css: &str) -> Color {
    css.parse().unwrap_or(Color::Blue)
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        let hints = match app.current_tab {
            Tab::Planner => "Enter: send  Up/Down: suggestion",
            Tab::Places | Tab::Activities => "Up/Down: move",
            Tab::Explore => "Enter: pick  Left/Right: place  F1-F3: layers  F4: category",
        };
        format!("Tab: switch screen  {hints}  Esc: quit")
    };

    let bar = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    )]));
    f.render_widget(bar, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn highlight(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}
