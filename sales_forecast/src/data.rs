//! Transaction loading from CSV files

use crate::error::{Result, SalesError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Date-only formats accepted for the timestamp column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time formats accepted for the timestamp column
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// A single retail transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Day the purchase happened
    pub timestamp: NaiveDate,
    /// Purchase amount
    pub amount: f64,
}

impl Transaction {
    pub fn new(timestamp: NaiveDate, amount: f64) -> Self {
        Self { timestamp, amount }
    }
}

/// Names of the CSV columns holding the timestamp and the amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date_column: String,
    pub amount_column: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: "Purchase_Date".to_string(),
            amount_column: "Purchase_Amount".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn new(date_column: impl Into<String>, amount_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            amount_column: amount_column.into(),
        }
    }
}

/// Overview of a loaded transaction file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    /// Number of rows read
    pub record_count: usize,
    /// Earliest transaction date
    pub first_date: NaiveDate,
    /// Latest transaction date
    pub last_date: NaiveDate,
    /// Sum of every amount in the file
    pub total_amount: f64,
}

/// Transactions loaded from one source, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSet {
    records: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    /// Get the loaded records
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summarize the set; `None` when it holds no records
    pub fn summary(&self) -> Option<DataSummary> {
        let first_date = self.records.iter().map(|r| r.timestamp).min()?;
        let last_date = self.records.iter().map(|r| r.timestamp).max()?;

        Some(DataSummary {
            record_count: self.records.len(),
            first_date,
            last_date,
            total_amount: self.records.iter().map(|r| r.amount).sum(),
        })
    }
}

/// Loader for transaction CSV files
#[derive(Debug, Clone, Default)]
pub struct TransactionLoader {
    columns: ColumnMapping,
}

impl TransactionLoader {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    /// Get the configured column names
    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Load transactions from a CSV file
    pub fn from_csv<P: AsRef<Path>>(&self, path: P) -> Result<TransactionSet> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading transactions");

        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Load transactions from any CSV byte stream
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<TransactionSet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(SalesError::EmptyInput(
                "The CSV file is empty".to_string(),
            ));
        }

        let date_idx = Self::resolve_column(&headers, &self.columns.date_column, &["date", "time"])?;
        let amount_idx = Self::resolve_column(
            &headers,
            &self.columns.amount_column,
            &["amount", "sales", "total"],
        )?;
        if date_idx == amount_idx {
            return Err(SalesError::MissingColumn(format!(
                "'{}' and '{}' both resolve to column '{}'",
                self.columns.date_column,
                self.columns.amount_column,
                headers.get(date_idx).unwrap_or_default()
            )));
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let raw_date = row.get(date_idx).unwrap_or_default();
            let raw_amount = row.get(amount_idx).unwrap_or_default();

            let timestamp = parse_timestamp(raw_date)
                .map_err(|e| SalesError::ParseError(format!("line {}: {}", line, e)))?;
            let amount = parse_amount(raw_amount)
                .map_err(|e| SalesError::ParseError(format!("line {}: {}", line, e)))?;

            records.push(Transaction { timestamp, amount });
        }

        if records.is_empty() {
            return Err(SalesError::EmptyInput(
                "The CSV file has a header but no rows".to_string(),
            ));
        }

        debug!(records = records.len(), "transactions parsed");
        Ok(TransactionSet::new(records))
    }

    /// Find a column by its configured name, falling back to the first header
    /// containing one of `hints`
    fn resolve_column(headers: &csv::StringRecord, name: &str, hints: &[&str]) -> Result<usize> {
        if let Some(idx) = headers.iter().position(|h| h == name) {
            return Ok(idx);
        }

        if let Some(idx) = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
        {
            return Ok(idx);
        }

        for (idx, header) in headers.iter().enumerate() {
            let lower = header.to_lowercase();
            if hints.iter().any(|hint| lower.contains(hint)) {
                debug!(expected = name, found = header, "column resolved by name hint");
                return Ok(idx);
            }
        }

        Err(SalesError::MissingColumn(format!(
            "expected '{}' in [{}]",
            name,
            headers.iter().collect::<Vec<_>>().join(", ")
        )))
    }
}

/// Parse a transaction timestamp down to its calendar date
pub fn parse_timestamp(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SalesError::ParseError("empty timestamp".to_string()));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }

    Err(SalesError::ParseError(format!(
        "unrecognized timestamp '{}'",
        raw
    )))
}

/// Parse a purchase amount, tolerating a leading currency sign and
/// thousands separators
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned
        .parse::<f64>()
        .map_err(|e| SalesError::ParseError(format!("invalid amount '{}': {}", raw.trim(), e)))
}
