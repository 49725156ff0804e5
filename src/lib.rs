//! # Sales Forecast Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`math`]: incremental smoothing, regression and residual statistics
//! - [`forecast`]: weekly bucketing, forecasting, chart alignment and quarter rollups
//! - [`web`]: the axum application serving the status page and the forecast chart
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sales_forecast_workspace::forecast::{bucket_weekly, Transaction};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let records = vec![
//!     Transaction::new(day(2), 10.0),
//!     Transaction::new(day(5), 5.0),
//!     Transaction::new(day(9), 7.0),
//! ];
//!
//! let weeks = bucket_weekly(&records).unwrap();
//! assert_eq!(weeks.len(), 2);
//! assert_eq!(weeks[0].week_end_date, day(7));
//! assert_eq!(weeks[0].total_amount, 15.0);
//! ```

pub use sales_forecast as forecast;
pub use sales_math as math;
pub use sales_web as web;
