//! Weekly time series handling for forecasting

use crate::bucketing::{add_weeks, WeeklyBucket};
use crate::error::{Result, SalesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weekly sales series, strictly increasing by week end date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    buckets: Vec<WeeklyBucket>,
}

impl WeeklySeries {
    /// Create a series from buckets, rejecting unordered or duplicate weeks
    pub fn new(buckets: Vec<WeeklyBucket>) -> Result<Self> {
        if let Some(pair) = buckets
            .windows(2)
            .find(|pair| pair[0].week_end_date >= pair[1].week_end_date)
        {
            return Err(SalesError::InvalidParameter(format!(
                "weekly series must be strictly increasing, found {} followed by {}",
                pair[0].week_end_date, pair[1].week_end_date
            )));
        }

        Ok(Self { buckets })
    }

    /// Create a series from `(week end, total)` pairs (for testing)
    pub fn from_values(points: &[(NaiveDate, f64)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|&(date, total)| WeeklyBucket::new(date, total))
                .collect(),
        )
    }

    /// Get the buckets
    pub fn buckets(&self) -> &[WeeklyBucket] {
        &self.buckets
    }

    /// Get the weekly totals as a vector
    pub fn values(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.total_amount).collect()
    }

    /// Get the week end dates as a vector
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.buckets.iter().map(|b| b.week_end_date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.buckets.first().map(|b| b.week_end_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.buckets.last().map(|b| b.week_end_date)
    }

    /// Week end dates of the `horizon` weeks after the last bucket
    ///
    /// Fails when the horizon runs past the last representable date.
    pub fn future_dates(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        match self.last_date() {
            Some(last) => (1..=horizon as u64).map(|k| add_weeks(last, k)).collect(),
            None => Ok(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_unordered_weeks() {
        let result = WeeklySeries::from_values(&[(date(2024, 1, 14), 1.0), (date(2024, 1, 7), 2.0)]);
        assert!(matches!(result, Err(SalesError::InvalidParameter(_))));

        let result = WeeklySeries::from_values(&[(date(2024, 1, 7), 1.0), (date(2024, 1, 7), 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_future_dates() {
        let series =
            WeeklySeries::from_values(&[(date(2024, 1, 7), 1.0), (date(2024, 1, 21), 3.0)]).unwrap();

        assert_eq!(
            series.future_dates(2).unwrap(),
            vec![date(2024, 1, 28), date(2024, 2, 4)]
        );
        assert!(series.future_dates(0).unwrap().is_empty());
        assert!(WeeklySeries::new(Vec::new()).unwrap().future_dates(3).unwrap().is_empty());
    }

    #[test]
    fn test_future_dates_past_last_date() {
        let series = WeeklySeries::from_values(&[(NaiveDate::MAX, 5.0)]).unwrap();
        assert!(matches!(series.future_dates(1), Err(SalesError::ParseError(_))));
    }
}
