//! Command-line front end for the indicator engine.
//!
//! Reads OHLC data points from a JSON file, applies one moving-average
//! indicator configured through CLI flags and/or a TOML options file,
//! and prints the computed output as JSON `{x, value}` pairs.

use anyhow::{Context, Result};
use chart_indicators::engine::config::{IndicatorKind, IndicatorOptions};
use chart_indicators::engine::fields::PriceField;
use chart_indicators::engine::indicator::Indicator;
use chart_indicators::engine::point::DataPoint;
use chart_indicators::engine::series::SeriesHandle;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Command-line arguments for the indicator run.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON array of OHLC data points.
    #[clap(short, long)]
    data: PathBuf,

    /// Path to a TOML file with indicator options.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Indicator kind: sma, wma, ema, dema or tema.
    #[clap(short, long)]
    indicator: Option<String>,

    /// Window length override.
    #[clap(short, long)]
    period: Option<usize>,

    /// Price field override: open, high, low, close, hl/2, hlc/3,
    /// hlcc/4 or ohlc/4.
    #[clap(short, long)]
    field: Option<String>,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

/// Options file layout: the indicator kind plus the engine options.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    indicator: Option<IndicatorKind>,
    #[serde(flatten)]
    options: IndicatorOptions,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize the tracing subscriber with a maximum log level
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let mut config = FileConfig::default();
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        debug!(?config, "loaded options file");
    }

    let kind = match &args.indicator {
        Some(raw) => raw.parse::<IndicatorKind>()?,
        None => config.indicator.unwrap_or_default(),
    };
    let mut options = config.options;
    if let Some(period) = args.period {
        options.period = period;
    }
    if let Some(raw) = &args.field {
        options.field = Some(raw.parse::<PriceField>()?);
    }

    let text = fs::read_to_string(&args.data)
        .with_context(|| format!("failed to read data file {}", args.data.display()))?;
    let points: Vec<DataPoint> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse data file {}", args.data.display()))?;
    info!(
        points = points.len(),
        %kind,
        period = options.period,
        "computing indicator"
    );

    let series = SeriesHandle::new(points);
    let mut indicator = Indicator::new(kind, options);
    indicator.set_price_series(Some(series));
    let output = indicator.evaluate();

    let emitted = output.iter().filter(|p| p.value.is_some()).count();
    info!(
        total = output.len(),
        emitted,
        absent = output.len() - emitted,
        "evaluation finished"
    );

    let rendered =
        serde_json::to_string_pretty(&*output).context("failed to encode output")?;
    println!("{rendered}");

    Ok(())
}
