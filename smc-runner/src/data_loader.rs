//! CSV ingestion of daily OHLCV bars.
//!
//! Expects a header row with `date,open,high,low,close,volume` (any column
//! order, extra columns ignored). Dates are `YYYY-MM-DD`. Rows that fail to
//! parse or fail bar validation are reported individually; the rest of the
//! file still loads.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use smc_core::domain::{PriceBar, PriceSeries, RejectedBar};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: bad date '{value}'")]
    Date { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// A loaded series plus everything that was left out of it.
#[derive(Debug)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    /// Rows that did not parse. `row` is the 1-based data row number.
    pub unparsed: Vec<LoadError>,
    /// Parsed bars rejected by validation, indexed among parsed bars.
    pub rejected: Vec<RejectedBar>,
}

/// Parse CSV text from any reader into a series for `symbol`.
///
/// Fails only when the header itself cannot be read.
pub fn load_csv<R: Read>(symbol: &str, reader: R) -> Result<LoadedSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.headers()?;

    let mut bars = Vec::new();
    let mut unparsed = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = i + 1;
        match record {
            Ok(r) => match parse_date(&r.date) {
                Some(date) => bars.push(PriceBar::new(date, r.open, r.high, r.low, r.close, r.volume)),
                None => unparsed.push(LoadError::Date { row, value: r.date }),
            },
            Err(e) => unparsed.push(LoadError::Csv(e)),
        }
    }

    let (series, rejected) = PriceSeries::from_bars(symbol, bars);
    if !unparsed.is_empty() || !rejected.is_empty() {
        warn!(
            "{symbol}: {} unparsed rows, {} rejected bars",
            unparsed.len(),
            rejected.len()
        );
    }
    debug!("{symbol}: loaded {} bars", series.len());

    Ok(LoadedSeries {
        series,
        unparsed,
        rejected,
    })
}

/// Load a CSV file. The symbol defaults to the file stem.
pub fn load_csv_file(path: &Path, symbol: Option<&str>) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");
    load_csv(symbol.unwrap_or(stem), file)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // Accept a trailing time component ("2024-01-02 00:00:00").
    let day = s.split([' ', 'T']).next().unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
