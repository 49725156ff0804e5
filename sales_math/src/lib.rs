//! # Sales Math
//!
//! Numeric building blocks for forecasting weekly sales totals.
//! This crate provides incremental implementations of the smoothing and
//! regression methods the forecasting models are built on, plus a few
//! residual statistics used to size confidence intervals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod forecasting;
pub mod moving_averages;
pub mod statistics;

pub use forecasting::{DoubleExponentialSmoothing, ExponentialSmoothing, LinearRegression};
pub use moving_averages::SimpleMovingAverage;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
