//! Error types for the sales_forecast crate

use chrono::NaiveDate;
use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum SalesError {
    /// A timestamp or amount could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No usable records were left to work with
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The forecast starts before the history ends
    #[error(
        "Disjoint series: forecast starts on {forecast_start} but history runs until {history_end}"
    )]
    DisjointSeries {
        forecast_start: NaiveDate,
        history_end: NaiveDate,
    },

    /// An entry is missing a field required at aggregation time
    #[error("Invalid entry on {date}: {reason}")]
    InvalidEntry { date: NaiveDate, reason: String },

    /// A required column is not present in the input
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error from the numeric primitives
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesError>;

impl From<statrs::StatsError> for SalesError {
    fn from(err: statrs::StatsError) -> Self {
        SalesError::ForecastingError(err.to_string())
    }
}

impl SalesError {
    /// Whether the error comes from the input data rather than from the
    /// caller's parameters
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            SalesError::ParseError(_)
                | SalesError::EmptyInput(_)
                | SalesError::MissingColumn(_)
                | SalesError::IoError(_)
                | SalesError::CsvError(_)
        )
    }
}
