use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Terminal events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// No input within one tick
    Tick,
}

/// Reads terminal input on a blocking thread and forwards it as [`Event`]s
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start reading input, emitting a tick whenever `tick_rate` passes
    /// without any
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = match crossterm::event::poll(tick_rate) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => Self::convert_crossterm_event(event),
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            };

            // Stop once the handler is gone
            if let Some(event) = event {
                if sender.send(event).is_err() {
                    break;
                }
            }
        });

        Self { receiver }
    }

    /// Get the next event; `None` once input can no longer be read
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }
}
