//! # Sales Web
//!
//! Web front end for the weekly sales forecaster: a data status page, a
//! forecast chart with quarterly totals, and JSON endpoints for both.

pub mod config;
pub mod context;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod server;

pub use config::AppConfig;
pub use context::{AppContext, HistoricalData};
pub use error::{Result, WebError};
pub use formatter::{HtmlFormatter, JsonFormatter, ReportFormatter};
pub use handlers::AppState;
pub use router::create_router;
pub use server::run_server;
