//! recordboard - Track, field, and cross-country record leaderboards.
//!
//! Reads each discipline's published record sheet, keeps an offline copy in
//! the local cache, and prints ranked leaderboards to the terminal.

mod output;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use recordboard_core::query::{self, default_event};
use recordboard_core::{
    Config, Connectivity, Discipline, FileStore, Gender, LeaderboardRequest, Limit, LoadOutcome,
    Loaded, Records, SheetClient, YearScope,
};

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser)]
#[command(name = "recordboard", version)]
#[command(about = "Track, field and cross-country record leaderboards")]
struct Cli {
    /// Serve cached sheets without refreshing them
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a ranked leaderboard
    Board(BoardArgs),
    /// List the events recorded for a discipline
    Events {
        #[arg(long, value_enum)]
        discipline: DisciplineCli,
    },
    /// List the years with rankable marks for an event
    Years {
        #[arg(long, value_enum)]
        discipline: DisciplineCli,
        #[arg(long, value_enum)]
        gender: Option<GenderCli>,
        #[arg(long)]
        event: Option<String>,
    },
    /// Re-download every sheet
    Refresh,
    /// Show how old each cached sheet is
    Status,
}

#[derive(Args)]
struct BoardArgs {
    #[arg(long, value_enum)]
    discipline: DisciplineCli,
    #[arg(long, value_enum)]
    gender: Option<GenderCli>,
    /// Event name; defaults to the first event on the sheet
    #[arg(long)]
    event: Option<String>,
    /// 10, 25, 50 or 100
    #[arg(long, value_parser = parse_limit)]
    top: Option<Limit>,
    #[arg(long, conflicts_with = "by_year")]
    year: Option<String>,
    /// One leaderboard per year, newest first
    #[arg(long, default_value_t = false)]
    by_year: bool,
    /// Only athletes whose name contains this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DisciplineCli {
    Competition,
    Training,
    Xc,
}

impl From<DisciplineCli> for Discipline {
    fn from(value: DisciplineCli) -> Self {
        match value {
            DisciplineCli::Competition => Discipline::Competition,
            DisciplineCli::Training => Discipline::Training,
            DisciplineCli::Xc => Discipline::CrossCountry,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GenderCli {
    Boys,
    Girls,
}

impl From<GenderCli> for Gender {
    fn from(value: GenderCli) -> Self {
        match value {
            GenderCli::Boys => Gender::Boys,
            GenderCli::Girls => Gender::Girls,
        }
    }
}

fn parse_limit(raw: &str) -> Result<Limit, String> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(Limit::from_count)
        .ok_or_else(|| format!("expected one of 10, 25, 50, 100; got {:?}", raw))
}

// ============================================================================
// Startup
// ============================================================================

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the process.
fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "recordboard.log".into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn build_records(config: &Config, online: bool) -> Result<Records> {
    let cache_dir = config.cache_dir()?;
    let store = FileStore::new(cache_dir)?;
    let client = SheetClient::new(config.sources.clone()).context("Failed to build HTTP client")?;
    Ok(Records::new(
        Arc::new(store),
        Arc::new(client),
        Connectivity::new(online),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref());
    info!(offline = cli.offline, "recordboard starting");

    let config = Config::load()?;
    let records = build_records(&config, !cli.offline)?;

    match cli.command {
        Commands::Board(args) => show_board(&records, &config, args).await,
        Commands::Events { discipline } => show_events(&records, discipline.into()).await,
        Commands::Years {
            discipline,
            gender,
            event,
        } => {
            let gender = gender.map(Gender::from).unwrap_or(config.default_gender);
            show_years(&records, discipline.into(), gender, event).await
        }
        Commands::Refresh => refresh(&records).await,
        Commands::Status => status(&records).await,
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Load a discipline from the cache, falling back to the network.
async fn load(records: &Records, discipline: Discipline) -> Result<Loaded> {
    let loaded = records.ensure_loaded(discipline).await?;
    if matches!(loaded.outcome, LoadOutcome::Fetched) {
        info!(discipline = %discipline, "Loaded from network");
    }
    Ok(loaded)
}

/// Let a background refresh started by `load` finish before the process
/// exits, so the cache is updated for next time.
async fn settle(loaded: Loaded) {
    if let LoadOutcome::CachedRefreshing(refresh) = loaded.outcome {
        match refresh.finished().await {
            Some(dataset) => eprintln!(
                "Updated {} records in the background ({} rows).",
                dataset.discipline.display_name(),
                dataset.len()
            ),
            None => warn!(discipline = %loaded.dataset.discipline, "Showing cached data; refresh failed"),
        }
    }
}

async fn show_board(records: &Records, config: &Config, args: BoardArgs) -> Result<()> {
    let discipline = Discipline::from(args.discipline);
    let loaded = load(records, discipline).await?;

    let gender = args.gender.map(Gender::from).unwrap_or(config.default_gender);
    let event = args
        .event
        .or_else(|| default_event(&loaded.dataset.records));
    let scope = match (args.year, args.by_year) {
        (Some(year), _) => YearScope::Year(year),
        (None, true) => YearScope::ByYear,
        (None, false) => YearScope::AllYears,
    };

    let mut request = LeaderboardRequest::new(discipline, gender)
        .with_limit(args.top.unwrap_or(config.default_limit))
        .with_scope(scope);
    if let Some(event) = event {
        request = request.with_event(event);
    }
    if let Some(search) = args.search {
        request = request.with_search(search);
    }

    // Rank against the snapshot just loaded, not one a background refresh
    // may swap in while we print.
    let board = query::leaderboard(&loaded.dataset.records, &request);
    print!("{}", output::render_leaderboard(&board, loaded.dataset.fetched_at));

    settle(loaded).await;
    Ok(())
}

async fn show_events(records: &Records, discipline: Discipline) -> Result<()> {
    let loaded = load(records, discipline).await?;
    let events = query::available_events(&loaded.dataset.records);
    if events.is_empty() {
        println!("No {} events recorded.", discipline.display_name());
    }
    for event in events {
        println!("{}", event);
    }
    settle(loaded).await;
    Ok(())
}

async fn show_years(
    records: &Records,
    discipline: Discipline,
    gender: Gender,
    event: Option<String>,
) -> Result<()> {
    let loaded = load(records, discipline).await?;
    let Some(event) = event.or_else(|| default_event(&loaded.dataset.records)) else {
        println!("No {} events recorded.", discipline.display_name());
        return Ok(());
    };

    let request = LeaderboardRequest::new(discipline, gender).with_event(event);
    for year in query::available_years(&loaded.dataset.records, &request) {
        println!("{}", year);
    }
    settle(loaded).await;
    Ok(())
}

async fn refresh(records: &Records) -> Result<()> {
    if !records.connectivity().is_online() {
        println!("Offline: nothing refreshed.");
        return Ok(());
    }
    let report = records.refresh_all().await;
    print!("{}", output::render_refresh_report(&report));

    let ages = records.cache().get_cache_ages().await;
    print!("{}", output::render_cache_ages(&ages));
    Ok(())
}

async fn status(records: &Records) -> Result<()> {
    let ages = records.cache().get_cache_ages().await;
    print!("{}", output::render_cache_ages(&ages));
    match records.last_updated().await {
        Some(at) => println!("Last updated: {}", at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")),
        None => println!("Last updated: never"),
    }
    Ok(())
}
