//! Moving average model for weekly sales forecasting

use crate::error::{Result, SalesError};
use crate::models::{require_weeks, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::WeeklySeries;
use sales_math::SimpleMovingAverage;

/// Simple Moving Average model
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Name of the model
    name: String,
    /// Window size in weeks
    window: usize,
}

/// Trained Simple Moving Average model
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    name: String,
    /// Average of the last `window` weeks
    last_average: f64,
    observed: Vec<f64>,
    fitted: Vec<f64>,
}

impl MovingAverage {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(SalesError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Simple Moving Average (window={})", window),
            window,
        })
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained> {
        let observed = require_weeks(series, self.window, &self.name)?;

        let mut sma = SimpleMovingAverage::new(self.window)?;
        let mut fitted = Vec::with_capacity(observed.len());

        // Until the window fills up, predict from the weeks seen so far
        for &value in &observed {
            fitted.push(sma.partial_value().unwrap_or(value));
            sma.update(value)?;
        }

        Ok(TrainedMovingAverage {
            name: self.name.clone(),
            last_average: sma.value()?,
            observed,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedMovingAverage {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        ForecastResult::new(vec![self.last_average; horizon], horizon)
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
    fn test_moving_average_forecast() {
        let model = MovingAverage::new(3).unwrap();
        let trained = model.train(&series(&[2.0, 4.0, 6.0, 8.0])).unwrap();

        assert_eq!(trained.fitted(), &[2.0, 2.0, 3.0, 4.0]);
        assert_eq!(trained.forecast(2).unwrap().values(), &[6.0, 6.0]);
    }

    #[test]
    fn test_moving_average_needs_full_window() {
        let model = MovingAverage::new(5).unwrap();
        assert!(matches!(
            model.train(&series(&[1.0, 2.0])),
            Err(SalesError::ForecastingError(_))
        ));
        assert!(MovingAverage::new(0).is_err());
    }
}
