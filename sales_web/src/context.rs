//! Shared application context
//!
//! The weekly history is built from the transaction file on first use and
//! kept for the life of the process. A failed load is kept too: every later
//! request sees the same error until the process restarts.

use crate::config::AppConfig;
use crate::error::{Result, WebError};
use once_cell::sync::OnceCell;
use sales_forecast::data::{DataSummary, TransactionLoader};
use sales_forecast::pipeline::{build_history, forecast_report};
use sales_forecast::provider::build_provider;
use sales_forecast::{ForecastReport, SalesError, WeeklySeries};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Transactions summary and the weekly series derived from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalData {
    pub summary: DataSummary,
    pub history: WeeklySeries,
}

impl HistoricalData {
    /// Weeks that had at least one sale
    pub fn weeks_with_sales(&self) -> usize {
        self.history
            .buckets()
            .iter()
            .filter(|b| b.record_count > 0)
            .count()
    }
}

type HistoryCell = OnceCell<std::result::Result<Arc<HistoricalData>, Arc<SalesError>>>;

#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    history: HistoryCell,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            history: OnceCell::new(),
        }
    }

    /// Context whose history is already known, skipping the file load
    pub fn with_history(config: AppConfig, data: HistoricalData) -> Self {
        Self {
            config,
            history: OnceCell::with_value(Ok(Arc::new(data))),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether the history has been loaded or has failed to load
    pub fn is_initialized(&self) -> bool {
        self.history.get().is_some()
    }

    /// The weekly history, loading it on first call
    ///
    /// Blocks on file IO; call from a blocking context.
    pub fn history(&self) -> Result<Arc<HistoricalData>> {
        let outcome = self.history.get_or_init(|| {
            self.load_history().map(Arc::new).map_err(|e| {
                error!(error = %e, path = %self.config.data.path.display(), "failed to load sales history");
                Arc::new(e)
            })
        });

        match outcome {
            Ok(data) => Ok(Arc::clone(data)),
            Err(err) => Err(WebError::DataUnavailable(Arc::clone(err))),
        }
    }

    /// Run the forecast pipeline for `weeks` future weeks
    pub fn forecast(&self, weeks: usize) -> Result<ForecastReport> {
        let data = self.history()?;
        let provider = build_provider(&self.config.forecast.model_settings())?;
        let options = self.config.forecast.options(weeks);

        Ok(forecast_report(&data.history, provider.as_ref(), &options)?)
    }

    fn load_history(&self) -> sales_forecast::Result<HistoricalData> {
        let data = &self.config.data;
        let week_end = data
            .week_end()
            .map_err(|e| SalesError::InvalidParameter(e.to_string()))?;

        let set = TransactionLoader::new(data.column_mapping()).from_csv(&data.path)?;
        let summary = set
            .summary()
            .ok_or_else(|| SalesError::EmptyInput("no transactions loaded".to_string()))?;
        let history = build_history(set.records(), week_end, data.fill_missing_weeks)?;

        info!(
            records = summary.record_count,
            weeks = history.len(),
            first = %summary.first_date,
            last = %summary.last_date,
            "sales history loaded"
        );

        Ok(HistoricalData { summary, history })
    }
}
