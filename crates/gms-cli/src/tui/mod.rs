//! Interactive TUI dashboard over the gardens and plants lists.

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

use crate::client::HttpApi;
use app::App;

/// Launch the dashboard against the API at `api`.
pub async fn run_dashboard(api: HttpApi) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api);
    app.refresh().await;

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<HttpApi>,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        // Redrawn every tick so a cleared banner disappears without input.
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
            } else if app.confirming {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        app.answer_delete(true).await;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.answer_delete(false).await;
                    }
                    _ => {}
                }
            } else if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    app.show_help = false;
                }
            } else {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                    KeyCode::Tab | KeyCode::BackTab => app.switch_tab(),
                    KeyCode::Char('j') | KeyCode::Down => app.move_down(),
                    KeyCode::Char('k') | KeyCode::Up => app.move_up(),
                    KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
                    KeyCode::Char('r') => app.refresh().await,
                    KeyCode::Char('?') => app.show_help = true,
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
