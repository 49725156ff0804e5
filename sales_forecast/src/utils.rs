//! Utility functions for the sales_forecast crate

use crate::bucketing::add_weeks;
use crate::data::Transaction;
use crate::error::{Result, SalesError};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(SalesError::InvalidParameter(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // Weeks without sales have no percentage error
    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        0.0
    } else {
        percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64
    };

    let smape = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            let abs_a = a.abs();
            let abs_f = f.abs();
            if abs_a + abs_f == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / (abs_a + abs_f)
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, over weeks with nonzero sales
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}

/// Generate synthetic transactions for demos and tests
///
/// Each of the `weeks` weeks starting at `start` gets `per_week` purchases
/// spread over its seven days. Amounts are normally distributed around
/// `base_amount` with a mild upward drift and are clamped at zero.
pub fn generate_transactions(
    start: NaiveDate,
    weeks: usize,
    per_week: usize,
    base_amount: f64,
    seed: u64,
) -> Result<Vec<Transaction>> {
    if weeks == 0 || per_week == 0 {
        return Err(SalesError::InvalidParameter(
            "weeks and per_week must be positive".to_string(),
        ));
    }
    if !(base_amount.is_finite() && base_amount > 0.0) {
        return Err(SalesError::InvalidParameter(format!(
            "base amount must be positive, got {}",
            base_amount
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, base_amount * 0.2)
        .map_err(|e| SalesError::InvalidParameter(e.to_string()))?;

    let mut records = Vec::with_capacity(weeks * per_week);
    for week in 0..weeks {
        let drift = 1.0 + 0.01 * week as f64;
        for _ in 0..per_week {
            let day = add_weeks(start, week as u64)?
                .checked_add_days(Days::new(rng.gen_range(0..7)))
                .ok_or_else(|| SalesError::InvalidParameter(format!("start date {} is too late", start)))?;
            let amount = (base_amount * drift + noise.sample(&mut rng)).max(0.0);
            records.push(Transaction::new(day, (amount * 100.0).round() / 100.0));
        }
    }

    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forecast_accuracy() {
        let accuracy = forecast_accuracy(&[10.0, 20.0], &[12.0, 16.0]).unwrap();
        assert_relative_eq!(accuracy.mae, 3.0);
        assert_relative_eq!(accuracy.mse, 10.0);
        assert_relative_eq!(accuracy.rmse, 10.0_f64.sqrt());
        assert_relative_eq!(accuracy.mape, (2.0 / 12.0 + 4.0 / 16.0) * 50.0);

        assert!(forecast_accuracy(&[1.0], &[]).is_err());
    }

    #[test]
    fn test_mape_skips_zero_weeks() {
        let accuracy = forecast_accuracy(&[5.0, 10.0], &[0.0, 20.0]).unwrap();
        assert_relative_eq!(accuracy.mape, 50.0);
    }

    #[test]
    fn test_generate_transactions_is_seeded() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = generate_transactions(start, 4, 3, 100.0, 7).unwrap();
        let b = generate_transactions(start, 4, 3, 100.0, 7).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.iter().all(|r| r.amount >= 0.0));
        assert!(a.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(generate_transactions(start, 0, 3, 100.0, 7).is_err());
        assert!(generate_transactions(NaiveDate::MAX, 2, 3, 100.0, 7).is_err());
    }
}
