use std::collections::HashMap;
use std::fmt;

use crate::config::{DF, INGEST};
use crate::domain::Candle;

use super::detect_timeframe;

/// Result of parsing a delimited upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUpload {
    pub candles: Vec<Candle>,
    /// Detected candle interval label, e.g. `1h` or `1d` (or `unknown`)
    pub timeframe: String,
}

#[derive(Debug)]
pub enum UploadError {
    Empty,
    /// Required columns absent after header detection
    MissingColumns(Vec<String>),
    Csv(csv::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UploadError::Empty => write!(f, "Upload is empty"),
            UploadError::MissingColumns(cols) => write!(
                f,
                "Invalid CSV. Required columns: {} (missing: {})",
                INGEST.required_columns.join(", "),
                cols.join(", ")
            ),
            UploadError::Csv(e) => write!(f, "CSV parse failed: {}", e),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for UploadError {
    fn from(e: csv::Error) -> Self {
        UploadError::Csv(e)
    }
}

/// Field positions of the columns a candle is built from.
struct ColumnLayout {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl ColumnLayout {
    fn number(record: &csv::StringRecord, idx: usize) -> Option<f64> {
        record.get(idx)?.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// `None` when the row is short or any price field is not a number.
    fn candle(&self, record: &csv::StringRecord) -> Option<Candle> {
        let date = record.get(self.date)?;
        let mut candle = Candle::from_close(Self::number(record, self.close)?)
            .with_date(date)
            .with_ohlc(
                Self::number(record, self.open)?,
                Self::number(record, self.high)?,
                Self::number(record, self.low)?,
            );
        candle.volume = self.volume.and_then(|idx| Self::number(record, idx));
        Some(candle)
    }
}

/// Picks the field separator from the first line: tab, then `;`, else `,`.
pub fn detect_separator(first_line: &str) -> u8 {
    if first_line.contains('\t') {
        b'\t'
    } else if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Parses an arbitrary delimited price file into candles.
///
/// - The separator is sniffed from the first line.
/// - The first row is a header if any field matches a known column keyword;
///   header names are trimmed and lower-cased.
/// - Without a header, columns are taken positionally as `date, open, high, low,
///   close`; anything after that is ignored.
/// - Rows with a non-numeric price are dropped.
pub fn parse_delimited(text: &str) -> Result<ParsedUpload, UploadError> {
    let text = text.trim();
    let first_line = text.lines().next().ok_or(UploadError::Empty)?;
    let separator = detect_separator(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let first = records.next().ok_or(UploadError::Empty)??;

    let has_header = first
        .iter()
        .any(|field| INGEST.header_keywords.contains(&field.to_lowercase().as_str()));

    // Column name -> field position
    let columns: HashMap<String, usize> = if has_header {
        first
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect()
    } else {
        INGEST
            .required_columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < first.len())
            .map(|(i, name)| (name.to_string(), i))
            .collect()
    };

    let missing: Vec<String> = INGEST
        .required_columns
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(UploadError::MissingColumns(missing));
    }

    let layout = ColumnLayout {
        date: columns["date"],
        open: columns["open"],
        high: columns["high"],
        low: columns["low"],
        close: columns["close"],
        volume: columns.get("volume").copied(),
    };

    let data_rows = if has_header { None } else { Some(Ok(first)) };
    let mut candles = Vec::new();
    let mut dropped = 0usize;

    for record in data_rows.into_iter().chain(records) {
        match layout.candle(&record?) {
            Some(candle) => candles.push(candle),
            None => dropped += 1,
        }
    }

    let dates: Vec<&str> = candles.iter().filter_map(|c| c.date.as_deref()).collect();
    let timeframe = detect_timeframe(&dates).to_string();

    if DF.log_ingest {
        log::info!(
            "[ingest] separator={:?} header={} rows={} dropped={} timeframe={}",
            separator as char,
            has_header,
            candles.len(),
            dropped,
            timeframe,
        );
    }

    Ok(ParsedUpload { candles, timeframe })
}
