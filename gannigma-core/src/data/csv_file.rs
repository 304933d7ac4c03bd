//! CSV file provider: one `<TICKER>.csv` per instrument in a directory.
//!
//! Expected header: `Date,Open,High,Low,Close` (case-insensitive, any extra
//! columns such as `Adj Close` or `Volume` are ignored). Dates are
//! `YYYY-MM-DD`. Empty price cells are read as NaN.

use super::provider::{require_data, CandleProvider, DataError, DataSource};
use crate::domain::{Candle, CandleSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "DATE")]
    date: NaiveDate,
    #[serde(alias = "Open", alias = "OPEN")]
    open: Option<f64>,
    #[serde(alias = "High", alias = "HIGH")]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "LOW")]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file for `ticker`; exact name first, then upper case.
    fn file_for(&self, ticker: &str) -> Option<PathBuf> {
        [ticker.to_string(), ticker.to_ascii_uppercase()]
            .into_iter()
            .map(|name| self.dir.join(format!("{name}.csv")))
            .find(|p| p.is_file())
    }

    /// Read every candle in a CSV file.
    pub fn read_file(path: &Path) -> Result<CandleSeries, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;

        let mut candles = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row =
                row.map_err(|e| DataError::Parse(format!("{} row {}: {e}", path.display(), line + 1)))?;
            candles.push(Candle::new(
                row.date,
                row.open.unwrap_or(f64::NAN),
                row.high.unwrap_or(f64::NAN),
                row.low.unwrap_or(f64::NAN),
                row.close.unwrap_or(f64::NAN),
            ));
        }

        Ok(CandleSeries::from_unsorted(candles))
    }
}

impl CandleProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvFile
    }

    fn fetch_daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CandleSeries, DataError> {
        let Some(path) = self.file_for(ticker) else {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
            });
        };
        let series = Self::read_file(&path)?;
        require_data(ticker, series.between(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reads_yahoo_style_export() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SPY.csv"),
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-03,101,103,100,102,102,1000\n\
             2024-01-02,100,102,99,101,101,1000\n\
             2024-01-04,102,,101,103,103,1000\n",
        )
        .unwrap();

        let provider = CsvProvider::new(dir.path());
        let series = provider
            .fetch_daily_candles("spy", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.first().unwrap().date, d(2024, 1, 2));
        assert!(series.last().unwrap().high.is_nan());
    }

    #[test]
    fn lowercase_header_and_range_filter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ABC.csv"),
            "date,open,high,low,close\n2024-01-02,1,2,0.5,1.5\n2024-02-02,1,2,0.5,1.5\n",
        )
        .unwrap();

        let provider = CsvProvider::new(dir.path());
        let series = provider
            .fetch_daily_candles("ABC", d(2024, 2, 1), d(2024, 2, 29))
            .unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let err = provider
            .fetch_daily_candles("NOPE", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, DataError::NoData { .. }));
    }

    #[test]
    fn bad_date_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "Date,Open,High,Low,Close\n01/02/2024,1,2,0.5,1.5\n",
        )
        .unwrap();
        let provider = CsvProvider::new(dir.path());
        let err = provider
            .fetch_daily_candles("BAD", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
