//! Command line entry point for the crux-rating engine
//!
//! Drives the full pipeline from cleaned result rows (JSON) to the rating
//! ledger, and exposes read-only leaderboard and history queries over a
//! saved ledger.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crux_rating::config::EngineConfig;
use crux_rating::engine::RatingEngine;
use crux_rating::ledger::Ledger;
use crux_rating::query::{athlete_history, leaderboard, LeaderboardFilter};
use crux_rating::types::ResultRow;
use crux_rating::RatingError;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Crux Rating - chronological Elo ratings for climbing competition results
#[derive(Parser)]
#[command(
    name = "crux-rating",
    version,
    about = "Chronological Elo rating engine for climbing competition results",
    long_about = "Crux Rating converts ranked competition results into evolving per-athlete \
                 Elo ratings. It supports full recomputation from a result corpus, incremental \
                 extension of an existing rating ledger, and leaderboard/history queries."
)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Rating ledger file
    #[arg(long, value_name = "FILE", default_value = "elo_history.json")]
    ledger: PathBuf,

    /// K factor override
    #[arg(long, value_name = "K")]
    k_factor: Option<f64>,

    /// Initial rating override
    #[arg(long, value_name = "RATING")]
    initial_rating: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recompute the full rating ledger from a result corpus
    Compute {
        /// JSON file of cleaned result rows
        input: PathBuf,
    },
    /// Extend an existing ledger with newly observed results
    Update {
        /// JSON file of cleaned result rows
        input: PathBuf,
    },
    /// Show the current leaderboard
    Leaderboard {
        /// Filter by discipline (e.g. Boulder, Lead, Speed)
        #[arg(long)]
        discipline: Option<String>,
        /// Filter by gender category
        #[arg(long)]
        gender: Option<String>,
        /// Number of athletes to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Show the full rating history for one athlete
    History {
        /// Athlete name (case-insensitive)
        athlete: String,
    },
    /// Export the ledger in its externally visible order
    Export {
        /// Destination file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = if let Some(config_path) = &args.config {
        EngineConfig::from_file(config_path)?
    } else {
        EngineConfig::from_env()?
    };

    if let Some(k) = args.k_factor {
        config.k_factor = k;
    }
    if let Some(rating) = args.initial_rating {
        config.initial_rating = rating;
    }

    config.validate()?;
    Ok(config)
}

/// Read cleaned result rows from a JSON file
fn read_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open results file {}", path.display()))?;
    let rows: Vec<ResultRow> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse results file {}", path.display()))?;

    info!("Loaded {} result rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Print a short top-10 summary after a compute or update run
fn print_summary(ledger: &Ledger) {
    let board = leaderboard(ledger, &LeaderboardFilter::default(), 10);
    if board.is_empty() {
        return;
    }

    println!("Current top {}:", board.len());
    for entry in board {
        println!(
            "{:2}. {:<28} {:>6.0}",
            entry.position, entry.name, entry.rating
        );
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    match args.command {
        Command::Compute { input } => {
            let engine = RatingEngine::new(config)?;
            let rows = read_rows(&input)?;
            let ledger = engine.compute(&rows)?;
            ledger.save(&args.ledger)?;
            print_summary(&ledger);
        }
        Command::Update { input } => {
            let engine = RatingEngine::new(config)?;
            let rows = read_rows(&input)?;

            // A missing ledger falls back to a fresh full computation
            let ledger = match Ledger::load(&args.ledger) {
                Ok(existing) => engine.extend(&existing, &rows)?,
                Err(e)
                    if matches!(
                        e.downcast_ref::<RatingError>(),
                        Some(RatingError::StateNotFound { .. })
                    ) =>
                {
                    warn!("No existing ledger found, starting fresh");
                    engine.compute(&rows)?
                }
                Err(e) => return Err(e),
            };

            ledger.save(&args.ledger)?;
            print_summary(&ledger);
        }
        Command::Leaderboard {
            discipline,
            gender,
            top,
        } => {
            let ledger = Ledger::load(&args.ledger)?;
            let filter = LeaderboardFilter { discipline, gender };
            let board = leaderboard(&ledger, &filter, top);

            if board.is_empty() {
                println!("No rated athletes match the given filters");
            }
            for entry in board {
                println!(
                    "{:2}. {:<28} {:<4} {:>6.0}",
                    entry.position,
                    entry.name,
                    entry.country.as_deref().unwrap_or("-"),
                    entry.rating
                );
            }
        }
        Command::History { athlete } => {
            let ledger = Ledger::load(&args.ledger)?;
            let history = athlete_history(&ledger, &athlete);

            if history.is_empty() {
                println!("No records found for {:?}", athlete);
            }
            for record in history {
                let rank = record
                    .rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {:<32} {:<14} {:<12} rank {:>3}  {:>7.1} -> {:>7.1} ({:+.1})",
                    record.date,
                    record.event,
                    record.round,
                    record.discipline,
                    rank,
                    record.elo_before,
                    record.elo_after,
                    record.elo_change
                );
            }
        }
        Command::Export { output } => {
            let ledger = Ledger::load(&args.ledger)?;

            // Presentation ordering only: date ascending, initialization
            // records before same-day results, then athlete name. The
            // ledger file itself stays in append order.
            let view = ledger.display_order();

            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| {
                        format!("Failed to create export file {}", path.display())
                    })?;
                    serde_json::to_writer_pretty(BufWriter::new(file), &view)
                        .with_context(|| format!("Failed to write export to {}", path.display()))?;
                    info!("Exported {} records to {}", view.len(), path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    serde_json::to_writer_pretty(stdout.lock(), &view)
                        .context("Failed to write export to stdout")?;
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
