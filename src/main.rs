use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hindsight::aggregate::AggregationMode;
use hindsight::calendar::Granularity;
use hindsight::config::ConfigLoader;
use hindsight::history::{open_store, Backend, HistoryStore};
use hindsight::ui::{render_day, render_month, render_week};
use hindsight::view::ViewController;

/// Calendar-style browser history viewer for the terminal
#[derive(Parser, Debug)]
#[command(name = "hindsight", version, about)]
struct Cli {
    /// View granularity: day, week, or month
    #[arg(long)]
    view: Option<Granularity>,

    /// Anchor date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Show every repeated visit instead of one entry per day
    #[arg(long)]
    repeated: bool,

    /// Search input, e.g. "rust -ads site:github.com"
    #[arg(long)]
    search: Option<String>,

    /// History backend: auto, chrome, chromium, brave, edge, vivaldi,
    /// opera, firefox, or demo
    #[arg(long)]
    browser: Option<Backend>,

    /// Print the filtered visit collection as JSON
    #[arg(long)]
    json: bool,

    /// Read navigation commands from stdin after the first render
    #[arg(long)]
    interactive: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config_loader = ConfigLoader::load().unwrap_or_else(|e| {
        error!("Failed to load config: {}, using defaults", e);
        ConfigLoader::new()
    });
    info!("Config loaded from {:?}", config_loader.path());
    let config = config_loader.config().clone();

    let granularity = cli.view.unwrap_or_else(|| {
        config
            .view
            .default_granularity
            .parse()
            .unwrap_or_else(|e| {
                warn!("{}, falling back to week view", e);
                Granularity::Week
            })
    });
    let mode = AggregationMode::from_repeated(cli.repeated || config.view.repeated_visits);
    let backend = cli.browser.unwrap_or_else(|| {
        config.browser.backend.parse().unwrap_or_else(|e| {
            warn!("{}, falling back to auto", e);
            Backend::Auto
        })
    });
    let color = config.ui.color && !cli.no_color;

    let store = open_store(backend).context("failed to open a browser history store")?;
    info!("Reading history from {}", store.label());

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let mut view = ViewController::new(date, granularity, mode);
    if let Some(search) = &cli.search {
        view.set_search(search);
    }

    view.refresh(store.as_ref())
        .context("history aggregation failed")?;
    render_view(&view, color, cli.json)?;

    if cli.interactive {
        run_interactive(&mut view, store.as_ref(), color)?;

        // Persist the last-used view state
        let mut config = config_loader.config().clone();
        config.view.default_granularity = view.granularity().to_string();
        config.view.repeated_visits = view.mode() == AggregationMode::EveryVisit;
        if let Err(e) = config_loader.update(config) {
            warn!("Failed to save view state: {}", e);
        }
    }

    Ok(())
}

fn render_view(view: &ViewController, color: bool, json: bool) -> Result<()> {
    let Some(filtered) = view.filtered() else {
        warn!("No visit collection to render");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    println!("{}", view.header());
    println!();
    match view.granularity() {
        Granularity::Day => print!("{}", render_day(&filtered, color)),
        Granularity::Week => print!("{}", render_week(&filtered, color)),
        Granularity::Month => print!("{}", render_month(&filtered, view.date())),
    }
    Ok(())
}

fn run_interactive(view: &mut ViewController, store: &dyn HistoryStore, color: bool) -> Result<()> {
    println!();
    println!(
        "Commands: n/p (next/previous), day, week, month, r (repeated visits), \
         / <terms> (search), j (json), q (quit)"
    );

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();

        let mut rebuild = true;
        let mut json = false;
        match input {
            "q" | "quit" => break,
            "n" => view.next_period(),
            "p" => view.previous_period(),
            "day" => view.set_granularity(Granularity::Day),
            "week" => view.set_granularity(Granularity::Week),
            "month" => view.set_granularity(Granularity::Month),
            "r" => view.toggle_repeated_visits(),
            "j" => {
                rebuild = false;
                json = true;
            }
            "" => rebuild = false,
            search if search.starts_with('/') => {
                // Search never rebuilds the bucket set, only re-filters it
                rebuild = false;
                let terms = search[1..].trim();
                if terms.is_empty() {
                    view.clear_search();
                } else {
                    view.set_search(terms);
                }
            }
            other => {
                println!("unknown command: {}", other);
                continue;
            }
        }

        if rebuild {
            if let Err(e) = view.refresh(store) {
                // Scoped to this aggregation; the previous view state stands
                error!("History read failed: {}", e);
                continue;
            }
        }
        render_view(view, color, json)?;
    }

    Ok(())
}
