//! Least squares linear trend model

use crate::error::Result;
use crate::models::{require_weeks, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::WeeklySeries;
use sales_math::LinearRegression;

/// Straight-line trend fitted over the whole history
#[derive(Debug, Clone)]
pub struct LinearTrend {
    name: String,
}

/// Trained linear trend model
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    name: String,
    regression: LinearRegression,
    observed: Vec<f64>,
    fitted: Vec<f64>,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self {
            name: "Linear Trend".to_string(),
        }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, series: &WeeklySeries) -> Result<Self::Trained> {
        let observed = require_weeks(series, 2, &self.name)?;
        let regression = LinearRegression::fit(&observed)?;

        let fitted = (0..observed.len())
            .map(|i| regression.value_at(i as f64))
            .collect::<sales_math::Result<Vec<f64>>>()?;

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            regression,
            observed,
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = (1..=horizon)
            .map(|h| self.regression.forecast(h))
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
