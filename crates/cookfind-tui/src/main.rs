use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

use cookfind_core::config::config_file_path;
use cookfind_core::links::open_in_browser;
use cookfind_core::{CancelSignal, Command, Config, CookingSite};

mod action;
mod app;
mod backend;
mod clipboard;
mod input;
mod logging;
mod model;
mod theme;
mod tui_event;
mod view;

use action::Action;
use app::{App, Effect};

/// Recipe finder TUI - search NYT Cooking by name and browse the matches.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Recipe name to search for on startup
    query: Option<String>,

    /// Site root to search (default: https://cooking.nytimes.com)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-page request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    // CLI flags > env vars > config file > defaults
    let mut config = match args.config.clone().or_else(config_file_path) {
        Some(path) => Config::load_or_default(&path)?,
        None => Config::default(),
    };
    config.apply_env();
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    Ok(config)
}

/// Carry out a side effect requested by the app.
fn perform(effect: Effect, app: &mut App, commands: &mpsc::UnboundedSender<Command>) {
    match effect {
        Effect::Dispatch(command) => {
            if commands.send(command).is_err() {
                tracing::error!("backend is gone; command dropped");
            }
        }
        Effect::CopyToClipboard(link) => {
            app.notice = Some(match clipboard::copy_to_clipboard(&link) {
                Ok(()) => "Link copied".to_string(),
                Err(e) => format!("Copy failed: {e}"),
            });
        }
        Effect::OpenUrl(url) => {
            app.notice = Some(match open_in_browser(&url) {
                Ok(()) => format!("Opened {url}"),
                Err(e) => format!("Could not open browser: {e}"),
            });
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Some(path) = &args.config {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
    }

    let log_guard = logging::init();
    let config = resolve_config(&args)?;
    tracing::info!(base_url = %config.base_url, timeout = config.timeout_secs, "starting");

    let source = Arc::new(CookingSite::new(&config)?);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(config.base_url.clone(), args.query);
    app.log_dir = log_guard.as_ref().map(|g| g.log_dir.clone());

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let backend_task = tokio::spawn(backend::run_backend(
        source,
        config.results_per_page,
        cmd_rx,
        tx,
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let shutdown = CancelSignal::new();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_for_signal.stop();
        }
    });

    if !app.input.trim().is_empty() {
        if let Some(effect) = app.update(Action::Search) {
            perform(effect, &mut app, &cmd_tx);
        }
    }

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, app.focus);
                        if let Some(effect) = app.update(action) {
                            perform(effect, &mut app, &cmd_tx);
                        }
                    }
                }
            } => {}
        }

        app.update(Action::Tick);

        if shutdown.is_cancelled() {
            app.should_quit = true;
        }
        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    // Closing the command channel aborts any running search
    drop(cmd_tx);
    let _ = backend_task.await;

    Ok(())
}
