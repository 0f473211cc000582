// Pick'em slate generator entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the JSON output)
// 2. Load config (copies defaults/ into config/ on first run)
// 3. Run the requested command and print its report

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use pickem::app::{self, SlateRequest};
use pickem::config;
use pickem_core::SearchMethod;

#[derive(Parser)]
#[command(name = "pickem")]
#[command(version, about = "Weekly spread pick'em slate generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate ranked pick slates for a week file
    Slates {
        /// Week CSV (favorite,underdog,spread,home,prime_time,rest,...)
        week_file: PathBuf,

        /// Week number, echoed in the report
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=30))]
        week: Option<u32>,

        /// Season year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// RNG seed for reproducible slates
        #[arg(long)]
        seed: Option<u64>,

        /// Search strategy (overrides config)
        #[arg(long, value_enum)]
        method: Option<MethodArg>,

        /// Number of slates to return (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        num_slates: Option<u64>,
    },

    /// Sample a tiebreaker total-points guess
    Tiebreaker {
        /// Posted over/under for the tiebreaker game
        over_under: f64,

        /// RNG seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize a graded pick history (overall, spread band, season, week, side)
    Record {
        /// Results CSV (week,date,favorite,underdog,spread,pick,correct)
        results_file: PathBuf,
    },

    /// Show win probabilities for an adjusted spread
    Probability {
        /// Adjusted spread; negative means the underdog is now favored
        #[arg(allow_negative_numbers = true)]
        spread: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Genetic,
    Exhaustive,
    Auto,
}

impl From<MethodArg> for SearchMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Genetic => SearchMethod::Genetic,
            MethodArg::Exhaustive => SearchMethod::Exhaustive,
            MethodArg::Auto => SearchMethod::Auto,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("pickem starting up");

    let config = config::load_config()
        .inspect_err(|e| error!("Config load failed: {e}"))
        .context("failed to load configuration")?;
    info!(
        "Config loaded: method={}, population={}, generations={}",
        config.optimizer.method.label(),
        config.optimizer.params.population_size,
        config.optimizer.params.generations
    );

    match cli.command {
        Commands::Slates {
            week_file,
            week,
            year,
            seed,
            method,
            num_slates,
        } => {
            let request = SlateRequest {
                week_path: week_file,
                week,
                year,
                seed,
                method: method.map(SearchMethod::from),
                num_slates: num_slates.map(|n| n as usize),
            };
            print_json(&app::run_slates(&config, &request)?)
        }
        Commands::Tiebreaker { over_under, seed } => {
            print_json(&app::run_tiebreaker(&config, over_under, seed)?)
        }
        Commands::Record { results_file } => print_json(&app::run_record(&results_file)?),
        Commands::Probability { spread } => print_json(&app::run_probability(spread)),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{text}");
    Ok(())
}

/// Set up tracing to log to `logs/pickem.log` under the working directory.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("pickem.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pickem=info,pickem_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
