//! Gannigma CLI: price-level analysis commands.
//!
//! Commands:
//! - `analyze`: run the 360°, prior-year and prior-month models for one ticker
//! - `divisors`: list the small-divisor table for one or all main rhythms

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gannigma_core::data::{CandleProvider, CsvProvider, SyntheticProvider, YahooProvider};
use gannigma_core::domain::{SearchMode, VolatilityTier};
use gannigma_core::levels::Divider;
use gannigma_runner::report::export_json;
use gannigma_runner::{
    format_price, generate_report, run_analysis, save_artifacts, AnalysisConfig, MainRhythm,
};

#[derive(Parser)]
#[command(name = "gannigma", about = "Gannigma: price-level analysis from ATR bands")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all three models for one ticker and print the report.
    Analyze(AnalyzeArgs),
    /// List the small divisors of the 360° grid.
    Divisors {
        /// Main rhythm: 0,36 | 3,6 | 36 | 360 | 3600. Lists all when omitted.
        #[arg(long)]
        rhythm: Option<MainRhythm>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol, e.g. BTC-USD or SPY.
    #[arg(long)]
    ticker: Option<String>,

    /// Analysis date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Search mode: seek_high | seek_low.
    #[arg(long)]
    mode: Option<SearchMode>,

    /// Volatility tier: normal | high | low.
    #[arg(long)]
    volatility: Option<VolatilityTier>,

    /// Accept the low volatility tier.
    #[arg(long, default_value_t = false)]
    allow_low_volatility: bool,

    /// ATR period in candles.
    #[arg(long)]
    atr_period: Option<usize>,

    /// Calendar days of history fetched ahead of the ATR warmup.
    #[arg(long)]
    data_buffer: Option<u32>,

    /// Main rhythm: 0,36 | 3,6 | 36 | 360 | 3600.
    #[arg(long)]
    rhythm: Option<MainRhythm>,

    /// Index into the small-divisor table (0-5).
    #[arg(long)]
    divisor_index: Option<usize>,

    /// Prior-year ladder divider: 8 or 16.
    #[arg(long, value_parser = parse_divider)]
    year_divider: Option<Divider>,

    /// Prior-month ladder divider: 8 or 16.
    #[arg(long, value_parser = parse_divider)]
    month_divider: Option<Divider>,

    /// Where candles come from.
    #[arg(long, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// Directory of <TICKER>.csv files for --source csv.
    #[arg(long, default_value = "data")]
    csv_dir: PathBuf,

    /// Print the full report as JSON instead of Markdown.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Save report.json, levels.csv and report.md under this directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Divisors { rhythm } => {
            run_divisors(rhythm);
            Ok(())
        }
    }
}

/// Human-readable logs on stderr so stdout stays clean for reports.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn parse_divider(s: &str) -> Result<Divider, String> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("divider must be 8 or 16, got '{s}'"))?;
    Divider::try_from(value)
}

fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(ticker) = &args.ticker {
        config.ticker = ticker.clone();
    }
    if let Some(date) = args.date {
        config.analysis_date = Some(date);
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(volatility) = args.volatility {
        config.volatility = volatility;
    }
    if args.allow_low_volatility {
        config.allow_low_volatility = true;
    }
    if let Some(period) = args.atr_period {
        config.atr_period = period;
    }
    if let Some(buffer) = args.data_buffer {
        config.data_buffer = buffer;
    }
    if let Some(rhythm) = args.rhythm {
        config.main_rhythm = rhythm;
    }
    if let Some(index) = args.divisor_index {
        config.small_divisor_index = index;
    }
    if let Some(divider) = args.year_divider {
        config.year_divider = divider;
    }
    if let Some(divider) = args.month_divider {
        config.month_divider = divider;
    }

    Ok(config)
}

fn build_provider(args: &AnalyzeArgs) -> Result<Box<dyn CandleProvider>> {
    Ok(match args.source {
        Source::Yahoo => Box::new(YahooProvider::new()?),
        Source::Csv => Box::new(CsvProvider::new(&args.csv_dir)),
        Source::Synthetic => Box::new(SyntheticProvider::new()),
    })
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = build_config(&args)?;
    let provider = build_provider(&args)?;
    info!(ticker = %config.ticker, provider = provider.name(), "starting analysis");

    let report = run_analysis(&config, provider.as_ref())
        .with_context(|| format!("analysis of '{}' failed", config.ticker))?;

    if args.json {
        println!("{}", export_json(&report)?);
    } else {
        print!("{}", generate_report(&report));
    }

    if let Some(output_dir) = &args.output_dir {
        let run_dir = save_artifacts(&report, output_dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }

    if report.all_failed() {
        for run in &report.models {
            if let Some(message) = run.error() {
                error!(model = run.kind.label(), "{message}");
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_divisors(rhythm: Option<MainRhythm>) {
    let rhythms = match rhythm {
        Some(r) => vec![r],
        None => MainRhythm::ALL.to_vec(),
    };

    for rhythm in rhythms {
        let divisors: Vec<String> = rhythm
            .small_divisors()
            .iter()
            .enumerate()
            .map(|(i, d)| format!("[{i}] {}", format_price(*d)))
            .collect();
        println!("{:>5}: {}", rhythm.label(), divisors.join("  "));
    }
}
