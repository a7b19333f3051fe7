//! Stock Analyzer - headless driver
//!
//! Runs one analysis request against the synthetic data source and prints
//! the report. Every setting can come from a flag or an environment
//! variable; `--config` loads a JSON [`AnalysisConfig`] first and flags
//! override it.
//!
//! ```text
//! stock-analyzer AAPL --period 6mo --seed 7 --trees 50
//! ANALYZER_PERIOD=2y stock-analyzer MSFT --brief
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use analysis::{AnalysisConfig, AnalysisReport, ModelOutcome, StockAnalyzer, SyntheticSource};
use types::Period;

/// Stock Analyzer - indicators, next-bar forecast and insights for one ticker
#[derive(Parser, Debug)]
#[command(name = "stock-analyzer")]
#[command(version)]
struct Args {
    /// Ticker symbol to analyze
    #[arg(value_name = "SYMBOL", env = "ANALYZER_SYMBOL", default_value = "DEMO")]
    symbol: String,

    /// History period (1mo, 3mo, 6mo, 1y, 2y, 5y)
    #[arg(short, long, env = "ANALYZER_PERIOD", default_value = "1y")]
    period: Period,

    /// Seed for the synthetic feed and the forest
    #[arg(long, env = "ANALYZER_SEED")]
    seed: Option<u64>,

    /// Number of trees in the forest
    #[arg(long, env = "ANALYZER_TREES")]
    trees: Option<usize>,

    /// JSON file with an analysis configuration
    #[arg(short, long, env = "ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Print a short text summary instead of the full JSON report
    #[arg(long)]
    brief: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AnalysisConfig::from_json_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(trees) = args.trees {
        config = config.n_trees(trees);
    }

    let source = SyntheticSource::new(config.model.forest.seed);
    let analyzer = StockAnalyzer::new(source, config);

    info!(symbol = %args.symbol, period = %args.period, "running analysis");
    let report = analyzer
        .analyze(&args.symbol, args.period)
        .with_context(|| format!("analyzing {}", args.symbol))?;

    if args.brief {
        print_brief(&report);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn print_brief(report: &AnalysisReport) {
    let metrics = &report.metrics;
    println!("{} ({}) over {}", report.display_name(), report.symbol, report.period);
    println!("  Last close: ${:.2}", metrics.latest_price);
    if let Some(pct) = metrics.price_change_pct {
        println!("  Change:     {:+.2}%", pct);
    }
    if let Some(rsi) = metrics.rsi {
        println!("  RSI:        {:.1}", rsi);
    }

    match &report.model {
        ModelOutcome::Trained(summary) => {
            println!(
                "  Forecast:   ${:.2} ({:+.2}%), confidence {:?}, test R² {:.3}",
                summary.predicted_price,
                summary.predicted_change_pct,
                summary.confidence,
                summary.test_score
            );
            for (name, importance) in summary.top_features(3) {
                println!("    {:<16} {:.3}", name, importance);
            }
        }
        ModelOutcome::Unavailable { reason } => println!("  Forecast:   unavailable ({})", reason),
    }

    println!();
    for insight in &report.insights {
        println!("  - {}", insight);
    }
}
