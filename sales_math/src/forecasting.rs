//! Forecasting primitives for weekly series
//!
//! Contains implementations of the methods the forecast models wrap:
//! - Linear Regression (least squares trend over a window)
//! - Exponential Smoothing
//! - Double Exponential Smoothing (Holt's linear method)
//!
//! All of them are fed one observation at a time with `update`, so a caller
//! can read the one-step-ahead forecast before each new observation arrives.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Linear Regression implementation for trend forecasting
#[derive(Debug, Clone)]
pub struct LinearRegression {
    period: usize,
    values: VecDeque<f64>,
    slope: Option<f64>,
    intercept: Option<f64>,
}

impl LinearRegression {
    /// Create a new Linear Regression with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Period must be at least 2 for linear regression".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            slope: None,
            intercept: None,
        })
    }

    /// Fit a regression over every value of `values`, indexed 0..n
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Linear regression needs at least 2 points, got {}",
                values.len()
            )));
        }

        let mut regression = Self::new(values.len())?;
        for &value in values {
            regression.update(value)?;
        }
        Ok(regression)
    }

    /// Update the Linear Regression with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot regress on non-finite value {}",
                value
            )));
        }

        self.values.push_back(value);

        if self.values.len() > self.period {
            self.values.pop_front();
        }

        if self.values.len() >= 2 {
            self.calculate_regression()?;
        }

        Ok(())
    }

    /// Calculate the linear regression parameters (slope and intercept)
    fn calculate_regression(&mut self) -> Result<()> {
        let n = self.values.len() as f64;

        let x_mean = (0..self.values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = self.values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in self.values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        self.slope = Some(slope);
        self.intercept = Some(intercept);

        Ok(())
    }

    /// Value of the fitted line at position `x` of the current window
    pub fn value_at(&self, x: f64) -> Result<f64> {
        match (self.slope, self.intercept) {
            (Some(slope), Some(intercept)) => Ok(slope * x + intercept),
            _ => Err(MathError::InsufficientData(
                "Not enough data for forecasting. Need at least 2 points.".to_string(),
            )),
        }
    }

    /// Predict the value n periods into the future
    pub fn forecast(&self, periods_ahead: usize) -> Result<f64> {
        if self.values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for forecasting. Need at least 2 points.".to_string(),
            ));
        }

        let x = (self.values.len() + periods_ahead - 1) as f64;
        self.value_at(x)
    }

    /// Number of values currently in the regression window
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the regression has seen no values yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

}

/// Exponential Smoothing implementation
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            level: None,
        })
    }

    /// Update the Exponential Smoothing with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        match self.level {
            None => {
                self.level = Some(value);
            }
            Some(current_level) => {
                // level = alpha * value + (1 - alpha) * previous_level
                let new_level = self.alpha * value + (1.0 - self.alpha) * current_level;
                self.level = Some(new_level);
            }
        }

        Ok(())
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Forecast the next value (in simple exponential smoothing, the forecast equals the last level)
    pub fn forecast(&self) -> Result<f64> {
        self.value()
    }
}

/// Double Exponential Smoothing (Holt's Method) implementation
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
    values_seen: usize,
}

impl DoubleExponentialSmoothing {
    /// Create a new Double Exponential Smoothing with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if beta <= 0.0 || beta >= 1.0 {
            return Err(MathError::InvalidInput(
                "Beta must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
            values_seen: 0,
        })
    }

    /// Update the Double Exponential Smoothing with a new value
    ///
    /// The trend is seeded from the first difference, so the second
    /// observation already carries a slope.
    pub fn update(&mut self, value: f64) -> Result<()> {
        self.values_seen += 1;

        match (self.level, self.trend) {
            (None, None) => {
                self.level = Some(value);
                self.trend = Some(0.0);
            }
            (Some(prev_level), Some(_)) if self.values_seen == 2 => {
                self.level = Some(value);
                self.trend = Some(value - prev_level);
            }
            (Some(prev_level), Some(prev_trend)) => {
                let new_level = self.alpha * value + (1.0 - self.alpha) * (prev_level + prev_trend);
                let new_trend =
                    self.beta * (new_level - prev_level) + (1.0 - self.beta) * prev_trend;

                self.level = Some(new_level);
                self.trend = Some(new_trend);
            }
            _ => {
                return Err(MathError::CalculationError(
                    "Inconsistent state: level and trend should both be Some or None".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Forecast h steps ahead
    pub fn forecast(&self, h: usize) -> Result<f64> {
        match (self.level, self.trend) {
            (Some(level), Some(trend)) => Ok(level + (h as f64) * trend),
            _ => Err(MathError::InsufficientData(
                "Not enough data to make a forecast".to_string(),
            )),
        }
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.level
            .ok_or_else(|| MathError::InsufficientData("Level not calculated yet".to_string()))
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.trend
            .ok_or_else(|| MathError::InsufficientData("Trend not calculated yet".to_string()))
    }}
