//! In-memory daily bar tables, one per asset type.
//!
//! Each table is loaded from `{data_dir}/{asset_type}.csv` with the header
//! `ticker,date,open,high,low,close,volume`. Rows with a blank or
//! unparseable value are dropped.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tickerdash_core::{parse_iso_date, AssetType, DateRange};
use time::Date;
use tracing::{debug, info};

use crate::error::StoreError;

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub ticker: String,
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    ticker: String,
    date: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_bar(self) -> Option<Bar> {
        let ticker = self.ticker.trim();
        if ticker.is_empty() {
            return None;
        }

        Some(Bar {
            ticker: ticker.to_owned(),
            date: parse_iso_date(&self.date).ok()?,
            open: finite(self.open)?,
            high: finite(self.high)?,
            low: finite(self.low)?,
            close: finite(self.close)?,
            volume: finite(self.volume)?,
        })
    }
}

/// `f64` parsing accepts `NaN` and `inf`; those count as missing.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

#[derive(Debug, Clone, Default)]
pub struct BarStore {
    tables: HashMap<AssetType, Vec<Bar>>,
}

impl BarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `{asset_type}.csv` found in `dir`; missing files leave that table empty.
    pub fn load_dir(dir: &Path) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for asset_type in AssetType::ALL {
            let path = dir.join(format!("{}.csv", asset_type.as_str()));
            if !path.is_file() {
                debug!(path = %path.display(), "no bar file for asset type");
                continue;
            }

            let file = File::open(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let bars = read_bars(file, &path)?;
            info!(%asset_type, rows = bars.len(), path = %path.display(), "loaded bars");
            store.extend(asset_type, bars);
        }
        Ok(store)
    }

    pub fn extend(&mut self, asset_type: AssetType, bars: impl IntoIterator<Item = Bar>) {
        self.tables.entry(asset_type).or_default().extend(bars);
    }

    /// Distinct tickers for `asset_type`, sorted.
    pub fn tickers(&self, asset_type: AssetType) -> Vec<String> {
        self.tables
            .get(&asset_type)
            .map(|bars| {
                bars.iter()
                    .map(|bar| bar.ticker.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Bars for `ticker` inside `range`, ordered by date.
    pub fn bars(&self, asset_type: AssetType, ticker: &str, range: DateRange) -> Vec<Bar> {
        let mut bars: Vec<Bar> = self
            .tables
            .get(&asset_type)
            .into_iter()
            .flatten()
            .filter(|bar| bar.ticker == ticker && range.contains(bar.date))
            .cloned()
            .collect();
        bars.sort_by_key(|bar| bar.date);
        bars
    }
}

/// Parse bar rows from CSV, dropping incomplete ones.
pub fn read_bars<R: Read>(reader: R, path: &Path) -> Result<Vec<Bar>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(|source| StoreError::Csv {
            path: PathBuf::from(path),
            source,
        })?;
        match row.into_bar() {
            Some(bar) => bars.push(bar),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, path = %path.display(), "dropped incomplete rows");
    }
    Ok(bars)
}
