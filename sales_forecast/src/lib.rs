//! # Sales Forecast
//!
//! Weekly aggregation and forecasting of retail transaction data.
//!
//! ## Features
//!
//! - Transaction loading from CSV with configurable column names
//! - Weekly bucketing on a configurable closing weekday, with optional gap filling
//! - Forecasting models (Exponential Smoothing, Holt, Moving Average, Linear Trend)
//! - Alignment of history and forecast into one chart series
//! - Calendar quarter rollups of the forecast
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Weekday;
//! use sales_forecast::data::TransactionLoader;
//! use sales_forecast::pipeline::{build_history, forecast_report, ForecastOptions};
//! use sales_forecast::provider::{build_provider, ModelSettings};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! // Load data
//! let records = TransactionLoader::default().from_csv("data/sample_transactions.csv")?;
//!
//! // Bucket into weeks ending on Sunday, filling empty weeks with zero
//! let history = build_history(records.records(), Weekday::Sun, true)?;
//!
//! // Forecast twelve weeks with the default Holt model
//! let provider = build_provider(&ModelSettings::default())?;
//! let report = forecast_report(&history, provider.as_ref(), &ForecastOptions::new(12))?;
//!
//! for quarter in &report.quarters {
//!     println!("{}: {:.2}", quarter, quarter.total_predicted);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod bucketing;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod quarters;
pub mod series;
pub mod utils;

// Re-export commonly used types
pub use crate::assembler::{assemble, ForecastPoint, UnifiedEntry};
pub use crate::bucketing::{bucket_weekly, WeeklyBucket};
pub use crate::data::{Transaction, TransactionLoader};
pub use crate::error::{Result, SalesError};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{ForecastOptions, ForecastReport};
pub use crate::provider::{ForecastProvider, ModelKind, ModelSettings};
pub use crate::quarters::{aggregate_quarters, QuarterlyRollup, ZeroQuarterPolicy};
pub use crate::series::WeeklySeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
