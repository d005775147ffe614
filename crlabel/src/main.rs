//! crlabel: label code-review comments, one at a time, against their diff.
//!
//! # Startup order
//!
//! 1. Parse flags and load config; errors print to stderr before any terminal
//!    setup.
//! 2. Logging goes to a file, since the terminal belongs to the UI.
//! 3. Panic hook, then the SIGTERM flag, then the terminal itself.
//! 4. Event task and API worker start; the session is started.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs.

mod api;
mod app;
mod cli;
mod config;
mod diff;
mod driver;
mod error;
mod event;
mod theme;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crlabel_core::client::HttpClient;
use crlabel_core::session::Event;

use crate::api::worker::AsyncApi;
use crate::app::AppState;
use crate::cli::Cli;
use crate::config::Config;
use crate::driver::Driver;
use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

fn init_logging(path: &Path) -> error::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("error: cannot open log file {}: {e}", config.log_file.display());
        std::process::exit(1);
    }
    info!(?config, "crlabel starting");

    if let Err(e) = run(config).await {
        error!(error = %e, "crlabel failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> error::Result<()> {
    let theme = theme::Theme::from_name(&config.theme);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let client = HttpClient::new(&config.server, config.request_timeout);
    let api = match AsyncApi::spawn(client, handler.tx.clone()) {
        Ok(api) => api,
        Err(e) => {
            tui::restore_tui()?;
            return Err(e.into());
        }
    };
    let mut driver = Driver::new(api, handler.tx.clone());
    let mut state = AppState::new(config.session.clone(), &config.syntax);

    driver.execute_all(state.dispatch(Event::Start));

    'event_loop: loop {
        tokio::select! {
            // Polls SIGTERM even when the bus is quiet.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    info!("SIGTERM received");
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %e, "draw failed");
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => handle_mouse(mouse, &mut state),
                    Some(AppEvent::Api(response)) => KeyAction::Session(response.into_event()),
                    Some(AppEvent::LockReleased(generation)) => {
                        KeyAction::Session(Event::LockReleased { generation })
                    }
                    Some(AppEvent::Resize(_, _)) | Some(AppEvent::Tick) => KeyAction::Continue,
                    None => KeyAction::Quit,
                };
                match action {
                    KeyAction::Continue => {}
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::Session(event) => driver.execute_all(state.dispatch(event)),
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    info!(labeled = state.session.state().submission_count(), "crlabel exiting");
    tui::restore_tui()?;
    Ok(())
}
