use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use cookfind_core::config::config_file_path;
use cookfind_core::links::{open_in_browser, recipe_url};
use cookfind_core::{CancelSignal, Config, SearchStatus};

mod output;

use output::{PageProgress, PrintSink};

/// Recipe finder - search NYT Cooking for a recipe by name
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Recipe name to search for
    query: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Site root to search (default: https://cooking.nytimes.com)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-page request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print matches as HTML links instead of bare URLs
    #[arg(long)]
    links: bool,

    /// Print the final outcome as JSON instead of streaming matches
    #[arg(long)]
    json: bool,

    /// Open the first exact match in the default browser
    #[arg(long)]
    open_first: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    // CLI flags > env vars > config file > defaults
    let mut config = match args.config.clone().or_else(config_file_path) {
        Some(path) => {
            tracing::debug!("config file: {}", path.display());
            Config::load_or_default(&path)?
        }
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

/// Handle one Ctrl+C. The first stops the search at the next page, keeping
/// what was found; returns `true` when the search was already stopping and
/// the process should exit without waiting for the page in flight.
fn interrupt(cancel: &CancelSignal) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    tracing::info!("stopping after the current page; press Ctrl+C again to quit");
    cancel.stop();
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging();

    if args.query.trim().is_empty() {
        anyhow::bail!("recipe name must not be empty");
    }
    if let Some(path) = &args.config {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
    }

    let config = resolve_config(&args)?;
    let color = !args.no_color;

    let cancel = CancelSignal::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupt(&cancel_for_signal) {
                eprintln!("interrupted");
                std::process::exit(130);
            }
        }
    });

    let mut progress = PageProgress::new();
    let mut sink = PrintSink {
        bar: progress.bar.clone(),
        base_url: config.base_url.clone(),
        color,
        links: args.links,
        quiet: args.json,
    };

    let outcome =
        cookfind_core::search(&args.query, &config, &mut sink, &mut progress, cancel).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let summary = format!(
            "{} exact, {} fuzzy ({} of {} pages, {})",
            outcome.exact_matches.len(),
            outcome.fuzzy_matches.len(),
            outcome.state.current_page.saturating_sub(1),
            outcome.state.total_pages,
            outcome.state.status.label()
        );
        if color {
            println!("{}", summary.dimmed());
        } else {
            println!("{summary}");
        }
        if let Some(msg) = outcome.no_results_message() {
            if color {
                println!("{}", msg.red());
            } else {
                println!("{msg}");
            }
        }
    }

    if args.open_first {
        if let Some(first) = outcome.exact_matches.first() {
            open_in_browser(&recipe_url(&config.base_url, &first.source_ref))?;
        }
    }

    if outcome.state.status == SearchStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}
