use std::io::{self, Stderr};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::warn;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Drives the "Generating..." animation
const TICK_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tx_events = tx.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(evt) = reader.next().await {
                let app_event = match evt {
                    // Only key presses; releases and repeats are noise here
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                    Ok(Event::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                    Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                    Ok(_) => None,
                    Err(e) => {
                        warn!("terminal event error: {}", e);
                        None
                    }
                };

                if let Some(event) = app_event {
                    if tx_events.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        let tx_tick = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                if tx_tick.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
