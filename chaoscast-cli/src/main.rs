//! ChaosCast CLI: evaluate a price series and inspect the chaos overlay.
//!
//! Commands:
//! - `evaluate`: fetch bars, run the pipeline, print the report and trading instruction
//! - `chaos`: print a raw or range-scaled logistic-map sequence

mod report;

use anyhow::{Context, Result};
use chaoscast_core::chaos::{self, ChaosParams};
use chaoscast_core::data::{load_series, CsvProvider, DataProvider, SyntheticProvider, YahooProvider};
use chaoscast_core::fingerprint::RunFingerprint;
use chaoscast_core::{evaluate, PipelineConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "chaoscast",
    about = "ChaosCast CLI: chaotic overlay, ARIMA forecast and Buy/Hold/Sell signal"
)]
struct Cli {
    /// Verbose logging (debug level). RUST_LOG takes precedence.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily bars, fit the model and print a trading instruction.
    Evaluate {
        /// Ticker symbol.
        #[arg(default_value = "BTC-USD")]
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2017-01-01")]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Path to a TOML pipeline config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read bars from a CSV file instead of Yahoo Finance.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Use deterministic synthetic bars (no network).
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Override the ATR threshold above which the signal is Hold.
        #[arg(long)]
        atr_threshold: Option<f64>,

        /// Override the number of forecast periods.
        #[arg(long)]
        horizon: Option<usize>,

        /// Emit the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a logistic-map sequence, optionally scaled into [min, max].
    Chaos {
        /// Initial condition, strictly inside (0, 1).
        #[arg(long, default_value_t = 0.5)]
        x0: f64,

        /// Control parameter in [0, 4].
        #[arg(long, default_value_t = 3.9)]
        r: f64,

        /// Number of values.
        #[arg(short, long, default_value_t = 10)]
        n: usize,

        /// Lower bound of the scaled range (requires --max).
        #[arg(long, requires = "max", allow_hyphen_values = true)]
        min: Option<f64>,

        /// Upper bound of the scaled range (requires --min).
        #[arg(long, requires = "min", allow_hyphen_values = true)]
        max: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command, cli.verbose) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init()
        .ok();
}

fn run(command: Commands, verbose: bool) -> Result<()> {
    match command {
        Commands::Evaluate {
            symbol,
            start,
            end,
            config,
            csv,
            synthetic,
            atr_threshold,
            horizon,
            json,
        } => run_evaluate(EvaluateArgs {
            symbol,
            start,
            end,
            config,
            csv,
            synthetic,
            atr_threshold,
            horizon,
            json,
            verbose,
        }),
        Commands::Chaos { x0, r, n, min, max } => run_chaos(x0, r, n, min.zip(max)),
    }
}

struct EvaluateArgs {
    symbol: String,
    start: String,
    end: Option<String>,
    config: Option<PathBuf>,
    csv: Option<PathBuf>,
    synthetic: bool,
    atr_threshold: Option<f64>,
    horizon: Option<usize>,
    json: bool,
    verbose: bool,
}

fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{s}', expected YYYY-MM-DD"))
}

fn build_config(args: &EvaluateArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(threshold) = args.atr_threshold {
        config.classifier.atr_threshold = threshold;
    }
    if let Some(horizon) = args.horizon {
        config.model.horizon = horizon;
    }
    config.validate().context("invalid pipeline configuration")?;
    Ok(config)
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let config = build_config(&args)?;

    let start = parse_date(&args.start, "--start")?;
    let end = match args.end.as_deref() {
        Some(s) => parse_date(s, "--end")?,
        None => chrono::Local::now().date_naive(),
    };

    let provider: Box<dyn DataProvider> = if let Some(path) = &args.csv {
        Box::new(CsvProvider::new(path))
    } else if args.synthetic {
        Box::new(SyntheticProvider::default())
    } else {
        Box::new(YahooProvider::new().context("initialising Yahoo Finance client")?)
    };

    let loaded = load_series(provider.as_ref(), &args.symbol, start, end).with_context(|| {
        format!(
            "loading {} from {} ({start} to {end})",
            args.symbol,
            provider.name()
        )
    })?;
    let series = &loaded.series;

    let evaluation = evaluate(series, &config)
        .with_context(|| format!("evaluating {} ({} bars)", args.symbol, series.len()))?;

    let as_of = series.last().date;
    let fingerprint = RunFingerprint::new(&config, series);
    let report = report::Report::new(&loaded, &evaluation, as_of, &fingerprint);

    if args.json {
        let out = serde_json::to_string_pretty(&report).context("serialising report")?;
        println!("{out}");
    } else {
        report.print(args.verbose);
    }
    Ok(())
}

fn run_chaos(x0: f64, r: f64, n: usize, range: Option<(f64, f64)>) -> Result<()> {
    ChaosParams { x0, r }.validate()?;
    let sequence = chaos::generate(x0, r, n)?;
    let values = match range {
        Some((min, max)) => chaos::scale_to_range(&sequence, min, max)?,
        None => sequence,
    };
    for (i, v) in values.iter().enumerate() {
        println!("{i:>5}  {v:.6}");
    }
    Ok(())
}
