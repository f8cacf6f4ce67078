//! SwingTrack CLI: evaluate tracked positions from local candle files.
//!
//! Commands:
//! - `evaluate`: one position against one candle CSV
//! - `batch`: every position in a book, candles at `<data-dir>/<SYMBOL>.csv`
//! - `indicators`: the indicator snapshot (and optional recent series)
//! - `replay`: walk a position forward session by session with a ratcheted stop

mod io;
mod render;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use swingtrack_core::batch::{BatchEvaluator, BatchReport, PositionJob};
use swingtrack_core::domain::{Candle, PositionDecision};
use swingtrack_core::fingerprint::{DecisionFingerprint, EvaluationRecord};
use swingtrack_core::indicators::{
    Atr, Ema, Indicator, IndicatorSnapshot, RelativeVolume, Rsi, Sma,
};
use swingtrack_core::input_builder::build_from_candles;
use swingtrack_core::replay::replay;
use swingtrack_core::{EngineConfig, PositionEvaluator};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "swingtrack",
    about = "SwingTrack CLI: daily decisions for open swing trades"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one position.
    Evaluate {
        /// Candle CSV (date,open,high,low,close,volume).
        #[arg(long)]
        candles: PathBuf,

        /// Position TOML file.
        #[arg(long)]
        position: PathBuf,

        /// Engine config TOML. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluation date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Print the full evaluation record as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Evaluate every position in a book.
    Batch {
        /// TOML file with `[[positions]]` entries.
        #[arg(long)]
        positions: PathBuf,

        /// Directory holding `<SYMBOL>.csv` candle files.
        #[arg(long)]
        data_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        as_of: Option<NaiveDate>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the indicator snapshot for a candle file.
    Indicators {
        #[arg(long)]
        candles: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Also print the last N sessions of each indicator series.
        #[arg(long)]
        series: Option<usize>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a position session by session from its entry date.
    Replay {
        #[arg(long)]
        candles: PathBuf,

        #[arg(long)]
        position: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Evaluate {
            candles,
            position,
            config,
            as_of,
            json,
        } => run_evaluate(&candles, &position, config.as_deref(), as_of, json),
        Commands::Batch {
            positions,
            data_dir,
            config,
            as_of,
            json,
        } => run_batch(&positions, &data_dir, config.as_deref(), as_of, json),
        Commands::Indicators {
            candles,
            config,
            series,
            json,
        } => run_indicators(&candles, config.as_deref(), series, json),
        Commands::Replay {
            candles,
            position,
            config,
            json,
        } => run_replay(&candles, &position, config.as_deref(), json),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose {
        "swingtrack=debug"
    } else {
        "swingtrack=info"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default)?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_file(p)
            .with_context(|| format!("invalid engine config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn today_or(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
}

#[derive(Serialize)]
struct EvaluationOutput {
    fingerprint: DecisionFingerprint,
    #[serde(flatten)]
    record: EvaluationRecord,
}

fn run_evaluate(
    candles_path: &Path,
    position_path: &Path,
    config_path: Option<&Path>,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let candles = io::load_candles(candles_path)?;
    let record = io::load_position(position_path)?;
    let as_of = today_or(as_of);

    let input = build_from_candles(&record, &candles, &config.indicators)
        .with_context(|| format!("cannot build input from {}", candles_path.display()))?;
    let decision = PositionEvaluator::new(config.evaluator.clone())
        .evaluate(&input, as_of)
        .context("evaluation failed")?;

    let label = record.symbol.clone().unwrap_or_else(|| {
        position_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "position".into())
    });
    info!(position = %label, status = decision.status.as_str(), %as_of, "evaluated");

    let evaluation = EvaluationRecord::new(as_of, &config.evaluator, input, decision)?;
    let fingerprint = evaluation.fingerprint()?;

    if json {
        let output = EvaluationOutput {
            fingerprint,
            record: evaluation,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::print_decision(&label, &evaluation.decision);
        println!("Fingerprint:    {fingerprint}");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<&'a PositionDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_batch(
    positions_path: &Path,
    data_dir: &Path,
    config_path: Option<&Path>,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let positions = io::load_positions(positions_path)?;
    let as_of = today_or(as_of);

    // One load per symbol; a missing file fails only the positions that need it.
    let mut by_symbol: HashMap<String, Result<Vec<Candle>, String>> = HashMap::new();
    let mut jobs = Vec::new();
    let mut load_failures: Vec<(String, String)> = Vec::new();
    let order: Vec<String> = positions.iter().map(|(id, _)| id.clone()).collect();
    for (id, record) in positions {
        let symbol = record.symbol.clone().unwrap_or_default();
        let loaded = by_symbol.entry(symbol.clone()).or_insert_with(|| {
            io::load_candles(&io::candle_path(data_dir, &symbol)).map_err(|e| format!("{e:#}"))
        });
        match loaded {
            Ok(candles) => jobs.push(PositionJob {
                id,
                record,
                candles: candles.clone(),
            }),
            Err(e) => load_failures.push((id, e.clone())),
        }
    }

    let report = BatchEvaluator::new(config).run_jobs(&jobs, as_of);
    let failed = report.failures().count() + load_failures.len();
    info!(
        evaluated = report.len(),
        failed,
        action_required = report.action_required().count(),
        %as_of,
        "batch complete"
    );

    if json {
        let rows = batch_rows(&order, &report, &load_failures);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", render::batch_header());
        println!("{}", "-".repeat(72));
        for (id, decision) in report.decisions() {
            println!("{}", render::decision_row(id, decision));
        }
        for (id, err) in report.failures() {
            eprintln!("Error for {id}: {err}");
        }
        for (id, err) in &load_failures {
            eprintln!("Error for {id}: {err}");
        }
    }

    if failed > 0 {
        bail!("{failed} position(s) could not be evaluated");
    }
    Ok(())
}

/// One row per position in file order, whether it was evaluated or its
/// candles failed to load.
fn batch_rows<'a>(
    order: &'a [String],
    report: &'a BatchReport,
    load_failures: &'a [(String, String)],
) -> Vec<BatchRow<'a>> {
    let mut rows: HashMap<&str, BatchRow<'a>> = report
        .outcomes
        .iter()
        .map(|o| {
            let row = BatchRow {
                id: &o.id,
                decision: o.result.as_ref().ok(),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            };
            (o.id.as_str(), row)
        })
        .collect();
    for (id, e) in load_failures {
        rows.insert(
            id,
            BatchRow {
                id,
                decision: None,
                error: Some(e.clone()),
            },
        );
    }
    order.iter().filter_map(|id| rows.remove(id.as_str())).collect()
}

#[derive(Serialize)]
struct SeriesRow {
    date: NaiveDate,
    values: Vec<(String, Option<f64>)>,
}

fn run_indicators(
    candles_path: &Path,
    config_path: Option<&Path>,
    series: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let candles = io::load_candles(candles_path)?;
    let snapshot = IndicatorSnapshot::derive(&candles, &config.indicators)
        .with_context(|| format!("cannot derive indicators from {}", candles_path.display()))?;

    let rows = series.map(|n| indicator_series(&candles, n)).unwrap_or_default();

    if json {
        let value = serde_json::json!({ "snapshot": snapshot, "series": rows });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    render::print_snapshot(&snapshot);
    if let Some(first) = rows.first() {
        println!();
        let names: Vec<&str> = first.values.iter().map(|(n, _)| n.as_str()).collect();
        println!("{:<10} {}", "Date", names.iter().map(|n| format!("{n:>10}")).collect::<String>());
        for row in &rows {
            let cells: String = row
                .values
                .iter()
                .map(|(_, v)| match v {
                    Some(x) => format!("{x:>10.2}"),
                    None => format!("{:>10}", "-"),
                })
                .collect();
            println!("{} {}", row.date, cells);
        }
    }
    Ok(())
}

/// The last `n` sessions of every indicator the engine derives.
fn indicator_series(candles: &[Candle], n: usize) -> Vec<SeriesRow> {
    let stack: Vec<Box<dyn Indicator>> = vec![
        Box::new(Ema::new(20)),
        Box::new(Ema::new(50)),
        Box::new(Sma::new(50)),
        Box::new(Rsi::new(14)),
        Box::new(Atr::new(14)),
        Box::new(RelativeVolume::new(20)),
    ];
    let computed: Vec<(String, Vec<f64>)> = stack
        .iter()
        .map(|ind| (ind.name().to_string(), ind.compute(candles)))
        .collect();

    let start = candles.len().saturating_sub(n);
    (start..candles.len())
        .map(|i| SeriesRow {
            date: candles[i].date,
            values: computed
                .iter()
                .map(|(name, values)| {
                    let v = values[i];
                    (name.clone(), v.is_finite().then_some(v))
                })
                .collect(),
        })
        .collect()
}

fn run_replay(
    candles_path: &Path,
    position_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let candles = io::load_candles(candles_path)?;
    let record = io::load_position(position_path)?;

    let run = replay(&record, &candles, &config).context("replay failed")?;
    info!(steps = run.steps.len(), "replay complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    if let Some(s) = &run.skipped {
        println!(
            "Not evaluated:  {} to {} ({} sessions held before 50 candles of history)",
            s.first, s.last, s.count
        );
    }
    let steps = run.steps;
    if steps.is_empty() {
        println!("No sessions to replay (need at least 50 candles up to the entry date).");
        return Ok(());
    }
    println!(
        "{:<10} {:>9} {:<13} {:>9} {:>9}",
        "Date", "Close", "Status", "Stop", "Ratchet"
    );
    for step in &steps {
        println!("{}", render::replay_row(step));
    }
    if let Some(r) = steps.last().and_then(|s| s.decision.rationale.as_ref()) {
        println!();
        println!("Final: {}", render::rationale_text(r));
    }
    Ok(())
}
