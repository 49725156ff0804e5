//! Forecast providers: the seam between the pipeline and the models
//!
//! A provider takes a weekly history and a horizon and answers with one
//! [`ForecastPoint`] per week from the start of the history through the last
//! forecast week. The in-sample points carry the model's one-step-ahead fit.

use crate::assembler::ForecastPoint;
use crate::error::{Result, SalesError};
use crate::models::exponential_smoothing::{HoltLinear, SimpleExponentialSmoothing};
use crate::models::linear_trend::LinearTrend;
use crate::models::moving_average::MovingAverage;
use crate::models::{z_score, ForecastModel, TrainedForecastModel};
use crate::series::WeeklySeries;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;
use tracing::debug;

/// Source of weekly forecasts
pub trait ForecastProvider: Debug + Send + Sync {
    /// Human readable model description
    fn name(&self) -> &str;

    /// In-sample fit for every history week followed by `horizon` future weeks
    fn forecast(&self, history: &WeeklySeries, horizon: usize) -> Result<Vec<ForecastPoint>>;
}

/// Provider backed by one of the crate's forecast models
#[derive(Debug, Clone)]
pub struct ModelForecaster<M: ForecastModel> {
    model: M,
    confidence_level: f64,
}

impl<M: ForecastModel> ModelForecaster<M> {
    pub fn new(model: M, confidence_level: f64) -> Result<Self> {
        // Validates the level up front rather than on the first request
        z_score(confidence_level)?;

        Ok(Self {
            model,
            confidence_level,
        })
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }
}

impl<M> ForecastProvider for ModelForecaster<M>
where
    M: ForecastModel + Send + Sync,
{
    fn name(&self) -> &str {
        self.model.name()
    }

    fn forecast(&self, history: &WeeklySeries, horizon: usize) -> Result<Vec<ForecastPoint>> {
        if history.is_empty() {
            return Err(SalesError::EmptyInput(
                "cannot forecast from an empty history".to_string(),
            ));
        }

        let trained = self.model.train(history)?;
        let sigma = trained.residual_std()?;
        let z = z_score(self.confidence_level)?;
        let in_sample_margin = z * sigma;

        let mut points = Vec::with_capacity(history.len() + horizon);

        for (bucket, &fitted) in history.buckets().iter().zip(trained.fitted()) {
            points.push(ForecastPoint::new(
                bucket.week_end_date,
                fitted,
                fitted - in_sample_margin,
                fitted + in_sample_margin,
            ));
        }

        let future = trained
            .forecast(horizon)?
            .with_normal_intervals(sigma, self.confidence_level)?;
        let intervals = future.intervals().unwrap_or_default();

        for ((date, &predicted), &(lower, upper)) in history
            .future_dates(horizon)?
            .into_iter()
            .zip(future.values())
            .zip(intervals)
        {
            points.push(ForecastPoint::new(date, predicted, lower, upper));
        }

        debug!(
            model = self.model.name(),
            sigma,
            points = points.len(),
            "forecast generated"
        );

        Ok(points)
    }
}

/// Forecast models selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    SimpleExponential,
    #[default]
    Holt,
    MovingAverage,
    LinearTrend,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::SimpleExponential => "simple_exponential",
            ModelKind::Holt => "holt",
            ModelKind::MovingAverage => "moving_average",
            ModelKind::LinearTrend => "linear_trend",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelKind {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "simple_exponential" | "ses" => Ok(ModelKind::SimpleExponential),
            "holt" | "double_exponential" => Ok(ModelKind::Holt),
            "moving_average" | "sma" => Ok(ModelKind::MovingAverage),
            "linear_trend" | "linear" => Ok(ModelKind::LinearTrend),
            other => Err(SalesError::InvalidParameter(format!(
                "Unknown forecast model: {}",
                other
            ))),
        }
    }
}

/// Parameters for building a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub kind: ModelKind,
    pub alpha: f64,
    pub beta: f64,
    pub window: usize,
    pub confidence_level: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            kind: ModelKind::Holt,
            alpha: 0.5,
            beta: 0.1,
            window: 4,
            confidence_level: 0.8,
        }
    }
}

/// Build the provider described by `settings`
pub fn build_provider(settings: &ModelSettings) -> Result<Box<dyn ForecastProvider>> {
    let level = settings.confidence_level;

    let provider: Box<dyn ForecastProvider> = match settings.kind {
        ModelKind::SimpleExponential => Box::new(ModelForecaster::new(
            SimpleExponentialSmoothing::new(settings.alpha)?,
            level,
        )?),
        ModelKind::Holt => Box::new(ModelForecaster::new(
            HoltLinear::new(settings.alpha, settings.beta)?,
            level,
        )?),
        ModelKind::MovingAverage => Box::new(ModelForecaster::new(
            MovingAverage::new(settings.window)?,
            level,
        )?),
        ModelKind::LinearTrend => Box::new(ModelForecaster::new(LinearTrend::new(), level)?),
    };

    Ok(provider)
}
