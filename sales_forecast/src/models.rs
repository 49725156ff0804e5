//! Forecasting models for weekly sales series

use crate::error::{Result, SalesError};
use crate::series::WeeklySeries;
use sales_math::statistics;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt::Debug;

pub mod exponential_smoothing;
pub mod linear_trend;
pub mod moving_average;

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Confidence intervals (optional)
    intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(SalesError::InvalidParameter(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
        })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the confidence intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Attach normal-theory intervals around the values
    ///
    /// The half-width for step `k` (1-based) is `z * sigma * sqrt(k)`, so the
    /// band widens the further out the forecast goes.
    pub fn with_normal_intervals(mut self, sigma: f64, confidence_level: f64) -> Result<Self> {
        let z = z_score(confidence_level)?;

        let intervals = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let margin = z * sigma * ((i + 1) as f64).sqrt();
                (v - margin, v + margin)
            })
            .collect();

        self.intervals = Some(intervals);
        Ok(self)
    }
}

/// Two-sided standard normal quantile for a confidence level in (0, 1)
pub fn z_score(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SalesError::InvalidParameter(format!(
            "Confidence level must be between 0 and 1, got {}",
            confidence_level
        )));
    }

    let normal = Normal::new(0.0, 1.0)?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for the `horizon` weeks after the training data
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// One-step-ahead predictions for every training week
    fn fitted(&self) -> &[f64];

    /// Weekly totals the model was trained on
    fn observed(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;

    /// Root mean square of the in-sample residuals
    fn residual_std(&self) -> Result<f64> {
        if self.observed().is_empty() {
            return Ok(0.0);
        }
        Ok(statistics::residual_rms(self.observed(), self.fitted())?)
    }
}

/// Forecast model that can be trained on a weekly series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a weekly series
    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Fail when `series` holds fewer than `needed` weeks
pub(crate) fn require_weeks(series: &WeeklySeries, needed: usize, model: &str) -> Result<Vec<f64>> {
    if series.len() < needed {
        return Err(SalesError::ForecastingError(format!(
            "{} needs at least {} weeks of history, got {}",
            model,
            needed,
            series.len()
        )));
    }
    Ok(series.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_z_score() {
        assert_relative_eq!(z_score(0.95).unwrap(), 1.959964, epsilon = 1e-4);
        assert_relative_eq!(z_score(0.8).unwrap(), 1.281552, epsilon = 1e-4);
        assert!(z_score(0.0).is_err());
        assert!(z_score(1.0).is_err());
        assert!(z_score(f64::NAN).is_err());
    }

    #[test]
    fn test_intervals_widen_with_horizon() {
        let result = ForecastResult::new(vec![100.0, 100.0, 100.0], 3)
            .unwrap()
            .with_normal_intervals(10.0, 0.95)
            .unwrap();

        let intervals = result.intervals().unwrap();
        let widths: Vec<f64> = intervals.iter().map(|(l, u)| u - l).collect();
        assert!(widths[0] < widths[1] && widths[1] < widths[2]);
        assert_relative_eq!(intervals[0].0, 100.0 - 19.59964, epsilon = 1e-3);
    }

    #[test]
    fn test_result_validation() {
        assert!(ForecastResult::new(vec![1.0], 2).is_err());

        let result = ForecastResult::new(vec![105.0, 106.0, 107.0], 3).unwrap();
        assert_eq!(result.horizons(), 3);
        assert!(result.intervals().is_none());
    }
}
