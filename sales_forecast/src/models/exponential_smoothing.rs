//! Exponential smoothing models for weekly sales forecasting

use crate::error::Result;
use crate::models::{require_weeks, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::WeeklySeries;
use sales_math::{DoubleExponentialSmoothing, ExponentialSmoothing};

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
}

/// Trained simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedSimpleExponentialSmoothing {
    name: String,
    smoother: ExponentialSmoothing,
    observed: Vec<f64>,
    fitted: Vec<f64>,
}

impl SimpleExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        // Validates alpha
        ExponentialSmoothing::new(alpha)?;

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
        })
    }
}

impl ForecastModel for SimpleExponentialSmoothing {
    type Trained = TrainedSimpleExponentialSmoothing;

    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained> {
        let observed = require_weeks(series, 1, &self.name)?;

        let mut smoother = ExponentialSmoothing::new(self.alpha)?;
        let mut fitted = Vec::with_capacity(observed.len());

        for &value in &observed {
            // Before the first update there is no level to predict from
            fitted.push(smoother.forecast().unwrap_or(value));
            smoother.update(value)?;
        }

        Ok(TrainedSimpleExponentialSmoothing {
            name: self.name.clone(),
            smoother,
            observed,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSimpleExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        // The forecast is flat at the last level
        let level = self.smoother.forecast()?;
        ForecastResult::new(vec![level; horizon], horizon)
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn observed(&self) -> &[f64] {
        &self.observed
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Holt's linear trend model (double exponential smoothing)
#[derive(Debug, Clone)]
pub struct HoltLinear {
    name: String,
    alpha: f64,
    beta: f64,
}

/// Trained Holt model
#[derive(Debug, Clone)]
pub struct TrainedHoltLinear {
    name: String,
    smoother: DoubleExponentialSmoothing,
    observed: Vec<f64>,
    fitted: Vec<f64>,
}

impl HoltLinear {
    /// Create a new Holt model with level smoothing `alpha` and trend smoothing `beta`
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        DoubleExponentialSmoothing::new(alpha, beta)?;

        Ok(Self {
            name: format!("Holt Linear (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
        })
    }
}

impl ForecastModel for HoltLinear {
    type Trained = TrainedHoltLinear;

    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained> {
        let observed = require_weeks(series, 2, &self.name)?;

        let mut smoother = DoubleExponentialSmoothing::new(self.alpha, self.beta)?;
        let mut fitted = Vec::with_capacity(observed.len());

        for &value in &observed {
            fitted.push(smoother.forecast(1).unwrap_or(value));
            smoother.update(value)?;
        }

        Ok(TrainedHoltLinear {
            name: self.name.clone(),
            smoother,
            observed,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedHoltLinear {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = (1..=horizon)
            .map(|h| self.smoother.forecast(h))
            .collect::<sales_math::Result<Vec<f64>>>()?;

        ForecastResult::new(values, horizon)
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn observed(&self) -> &[f64] {
        &self.observed
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> WeeklySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let points: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + Duration::weeks(i as i64), v))
            .collect();
        WeeklySeries::from_values(&points).unwrap()
    }

    #[test]
    fn test_simple_smoothing_flat_forecast() {
        let model = SimpleExponentialSmoothing::new(0.5).unwrap();
        let trained = model.train(&series(&[10.0, 20.0, 30.0])).unwrap();

        // Levels: 10, 15, 22.5
        assert_eq!(trained.fitted(), &[10.0, 10.0, 15.0]);

        let forecast = trained.forecast(3).unwrap();
        assert_eq!(forecast.values(), &[22.5, 22.5, 22.5]);
    }

    #[test]
    fn test_holt_follows_trend() {
        let model = HoltLinear::new(0.8, 0.2).unwrap();
        let trained = model.train(&series(&[10.0, 20.0, 30.0, 40.0])).unwrap();

        let forecast = trained.forecast(2).unwrap();
        assert_relative_eq!(forecast.values()[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.values()[1], 60.0, epsilon = 1e-9);
        assert_eq!(trained.fitted().len(), 4);
    }

    #[test]
    fn test_holt_needs_two_weeks() {
        let model = HoltLinear::new(0.5, 0.5).unwrap();
        assert!(model.train(&series(&[10.0])).is_err());
        assert!(HoltLinear::new(0.5, 0.0).is_err());
        assert!(SimpleExponentialSmoothing::new(1.5).is_err());
    }
}
