//! End-to-end forecasting pipeline
//!
//! records -> weekly buckets -> history -> provider -> unified series ->
//! quarterly rollups

use crate::assembler::{assemble, forecast_region, forecast_tail, ForecastPoint, UnifiedEntry};
use crate::bucketing::{bucket_weekly_ending, fill_missing_weeks, WeeklyBucket};
use crate::data::Transaction;
use crate::error::{Result, SalesError};
use crate::provider::ForecastProvider;
use crate::quarters::{aggregate_quarters_with, QuarterlyRollup, ZeroQuarterPolicy};
use crate::series::WeeklySeries;
use crate::utils::{forecast_accuracy, ForecastAccuracy};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Options for a single forecast request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastOptions {
    /// Number of future weeks to forecast
    pub horizon_weeks: usize,
    pub zero_quarters: ZeroQuarterPolicy,
}

impl ForecastOptions {
    pub fn new(horizon_weeks: usize) -> Self {
        Self {
            horizon_weeks,
            zero_quarters: ZeroQuarterPolicy::default(),
        }
    }

    pub fn with_zero_quarters(mut self, policy: ZeroQuarterPolicy) -> Self {
        self.zero_quarters = policy;
        self
    }
}

/// Everything a formatter needs to render one forecast
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub model: String,
    pub horizon_weeks: usize,
    pub history_end: NaiveDate,
    /// Date-ordered actual and predicted values
    pub series: Vec<UnifiedEntry>,
    pub quarters: Vec<QuarterlyRollup>,
    /// In-sample fit quality, absent when the provider returned no fit
    pub accuracy: Option<ForecastAccuracy>,
}

impl ForecastReport {
    /// Entries after the last historical week
    pub fn forecast_entries(&self) -> Vec<UnifiedEntry> {
        forecast_region(&self.series)
    }

    /// Sum of predicted values over the forecast region
    pub fn total_predicted(&self) -> f64 {
        self.quarters.iter().map(|q| q.total_predicted).sum()
    }
}

/// Bucket raw records into the weekly history used for forecasting
pub fn build_history(
    records: &[Transaction],
    week_end: Weekday,
    fill_gaps: bool,
) -> Result<WeeklySeries> {
    let buckets = bucket_weekly_ending(records, week_end)?;
    let buckets = if fill_gaps {
        fill_missing_weeks(&buckets)?
    } else {
        buckets
    };

    info!(
        records = records.len(),
        weeks = buckets.len(),
        "weekly history built"
    );

    WeeklySeries::new(buckets)
}

/// Forecast `options.horizon_weeks` weeks past `history` and align the result
/// with the actuals for charting
pub fn forecast_report(
    history: &WeeklySeries,
    provider: &dyn ForecastProvider,
    options: &ForecastOptions,
) -> Result<ForecastReport> {
    if options.horizon_weeks == 0 {
        return Err(SalesError::InvalidParameter(
            "Forecast horizon must be at least one week".to_string(),
        ));
    }

    let history_end = history.last_date().ok_or_else(|| {
        SalesError::EmptyInput("cannot forecast from an empty history".to_string())
    })?;

    let points = provider.forecast(history, options.horizon_weeks)?;
    let accuracy = in_sample_accuracy(history.buckets(), &points)?;

    let tail = forecast_tail(&points, history_end);
    let series = assemble(history.buckets(), &tail)?;
    let quarters = aggregate_quarters_with(&forecast_region(&series), options.zero_quarters)?;

    debug!(
        model = provider.name(),
        entries = series.len(),
        quarters = quarters.len(),
        "forecast report assembled"
    );

    Ok(ForecastReport {
        model: provider.name().to_string(),
        horizon_weeks: options.horizon_weeks,
        history_end,
        series,
        quarters,
        accuracy,
    })
}

/// Compare the provider's in-sample points with the actual weekly totals
fn in_sample_accuracy(
    history: &[WeeklyBucket],
    points: &[ForecastPoint],
) -> Result<Option<ForecastAccuracy>> {
    let predicted: HashMap<NaiveDate, f64> = points.iter().map(|p| (p.date, p.predicted)).collect();

    let (fitted, actual): (Vec<f64>, Vec<f64>) = history
        .iter()
        .filter_map(|b| predicted.get(&b.week_end_date).map(|&p| (p, b.total_amount)))
        .unzip();

    if fitted.is_empty() {
        return Ok(None);
    }

    forecast_accuracy(&fitted, &actual).map(Some)
}
