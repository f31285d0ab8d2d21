//! Terminal presenter using ratatui

mod app;
mod events;
mod form;
mod layout;
mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};
pub use layout::DialogLayout;

use crate::config::TerminalSettings;
use crate::dialogs::DialogRenderer;
use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::future::Future;
use std::io;
use std::time::Duration;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leaves raw mode and the alternate screen if dropped while still armed,
/// which covers a panic unwinding out of the presentation loop
struct TerminalGuard {
    armed: bool,
}

impl TerminalGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = disable_raw_mode();
            let mut stdout = io::stdout();
            let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        }
    }
}

/// Present the dialog stack until `work` completes and return its output.
///
/// `work` is typically a task awaiting one or more dialog futures; it is
/// polled alongside the input loop.
pub async fn run<F>(renderer: DialogRenderer, settings: TerminalSettings, work: F) -> Result<F::Output>
where
    F: Future,
{
    let mut terminal = init_terminal()?;
    let guard = TerminalGuard { armed: true };
    let tick_rate = Duration::from_millis(settings.tick_rate_ms);
    let mut app = App::new(renderer, settings);
    let mut events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &mut events, work).await;

    guard.disarm();
    restore_terminal(&mut terminal)?;
    result
}

/// Main presentation loop
async fn run_app<F>(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    events: &mut EventHandler,
    work: F,
) -> Result<F::Output>
where
    F: Future,
{
    tokio::pin!(work);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            output = &mut work => return Ok(output),
            event = events.next() => match event {
                Some(event) => app.handle_event(event),
                None => anyhow::bail!("Terminal input closed while dialogs were pending"),
            },
        }
    }
}
