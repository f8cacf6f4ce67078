//! File loading: candle CSVs and position TOML files.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use swingtrack_core::domain::Candle;
use swingtrack_core::input_builder::PositionRecord;
use tracing::{debug, warn};

/// Read daily candles from a CSV with header `date,open,high,low,close,volume`.
///
/// Rows with NaN or inconsistent OHLC values are skipped with a warning.
/// Rows are sorted by date; duplicate dates are an error.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open candle file {}", path.display()))?;

    let mut candles = Vec::new();
    for (row, record) in reader.deserialize::<Candle>().enumerate() {
        let candle = record
            .with_context(|| format!("{}: malformed row {}", path.display(), row + 2))?;
        if !candle.is_sane() {
            warn!(file = %path.display(), date = %candle.date, "skipping invalid candle");
            continue;
        }
        candles.push(candle);
    }

    candles.sort_by_key(|c| c.date);
    if let Some(pair) = candles.windows(2).find(|w| w[0].date == w[1].date) {
        bail!("{}: duplicate candle for {}", path.display(), pair[0].date);
    }

    debug!(file = %path.display(), count = candles.len(), "loaded candles");
    Ok(candles)
}

/// Read a single position record.
pub fn load_position(path: &Path) -> Result<PositionRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read position file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse position file {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct PositionsFile {
    #[serde(default)]
    positions: Vec<PositionRecord>,
}

/// Read every `[[positions]]` entry and give each a unique id derived from
/// its symbol (`AAPL`, `AAPL#2`, ...). Every entry must name a symbol.
pub fn load_positions(path: &Path) -> Result<Vec<(String, PositionRecord)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read positions file {}", path.display()))?;
    let file: PositionsFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse positions file {}", path.display()))?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(file.positions.len());
    for (i, record) in file.positions.into_iter().enumerate() {
        let Some(symbol) = record.symbol.clone() else {
            bail!("{}: position {} has no symbol", path.display(), i + 1);
        };
        let n = seen.entry(symbol.clone()).or_insert(0);
        *n += 1;
        let id = if *n == 1 {
            symbol
        } else {
            format!("{symbol}#{n}")
        };
        out.push((id, record));
    }
    Ok(out)
}

/// `<data_dir>/<SYMBOL>.csv`
pub fn candle_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{symbol}.csv"))
}
