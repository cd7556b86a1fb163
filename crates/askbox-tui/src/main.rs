use std::path::PathBuf;

use anyhow::Result;
use askbox_core::{AskClient, ChatSession, Config, Reply};
use clap::Parser;
use tracing::{error, info};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{AppEvent, EventHandler, Tui};

#[derive(Parser)]
#[command(name = "askbox", version)]
#[command(about = "Terminal chat client for a personal chatbot backend")]
struct Cli {
    /// Base URL of the chat backend (overrides ASKBOX_API_URL and config.json)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Where to write logs
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// What woke the main loop
enum Wake {
    Event(Option<AppEvent>),
    Reply(Reply),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init_or_warn(&log_path, cli.verbose);

    let config = Config::load(cli.api_url);
    info!(api_url = %config.api_url, "starting askbox");

    let session = ChatSession::new(AskClient::new(&config.api_url));
    let mut app = App::new(session);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    if let Err(e) = &result {
        error!("askbox exited with error: {:#}", e);
    }
    info!(messages = app.session.transcript().len(), "askbox stopped");
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let wake = tokio::select! {
            event = events.next() => Wake::Event(event),
            reply = app.next_reply(), if app.reply_task.is_some() => Wake::Reply(reply),
        };

        match wake {
            Wake::Event(Some(event)) => handler::handle_event(app, event),
            Wake::Event(None) => break,
            Wake::Reply(reply) => app.finish_reply(reply),
        }
    }

    Ok(())
}
