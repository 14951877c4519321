//! Interactive terminal front-end: planner chat, place and activity lists,
//! and the explore screen with a live map.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use islander_core::model::Layer;

use app::App;

/// Launch the interactive dashboard.
pub async fn run_dashboard(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.status_message = None;

                match key.code {
                    KeyCode::Esc => app.should_quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::BackTab => app.prev_tab(),
                    KeyCode::Up => app.move_up(),
                    KeyCode::Down => app.move_down(),
                    KeyCode::Left => app.move_left(),
                    KeyCode::Right => app.move_right(),
                    KeyCode::Enter => app.submit(),
                    KeyCode::Backspace => app.backspace(),
                    KeyCode::F(1) => app.toggle_layer(Layer::Places),
                    KeyCode::F(2) => app.toggle_layer(Layer::Bus),
                    KeyCode::F(3) => app.toggle_layer(Layer::User),
                    KeyCode::F(4) => app.cycle_marker_category(),
                    KeyCode::Char(c) => app.type_char(c),
                    _ => {}
                }
            }
        } else {
            // Yield so spawned planner and search tasks make progress.
            tokio::task::yield_now().await;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
