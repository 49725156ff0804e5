//! Alignment of historical and forecast series for charting
//!
//! The chart draws one line for actual totals and one for predicted totals.
//! Both lines share the boundary week, where the predicted value is pinned to
//! the actual one so the two lines meet.

use crate::bucketing::WeeklyBucket;
use crate::error::{Result, SalesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One forecast week as produced by a forecast provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, predicted: f64, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            date,
            predicted,
            lower_bound,
            upper_bound,
        }
    }
}

/// One date of the merged chart series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEntry {
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl UnifiedEntry {
    fn historical(date: NaiveDate, actual: f64) -> Self {
        Self {
            date,
            actual: Some(actual),
            predicted: None,
            lower: None,
            upper: None,
        }
    }

    fn forecast(point: &ForecastPoint) -> Self {
        Self {
            date: point.date,
            actual: None,
            predicted: Some(point.predicted),
            lower: Some(point.lower_bound),
            upper: Some(point.upper_bound),
        }
    }

    fn boundary(actual: f64, point: &ForecastPoint) -> Self {
        Self {
            date: point.date,
            actual: Some(actual),
            predicted: Some(actual),
            lower: Some(point.lower_bound),
            upper: Some(point.upper_bound),
        }
    }

    /// The week shared by history and forecast
    pub fn is_boundary(&self) -> bool {
        self.actual.is_some() && self.predicted.is_some()
    }

    /// A week with no actual value
    pub fn is_forecast_only(&self) -> bool {
        self.actual.is_none()
    }
}

/// Merge history and forecast into one date-ordered series
///
/// The forecast may start on the last historical week (the boundary) or
/// later, never earlier.
pub fn assemble(historical: &[WeeklyBucket], forecast: &[ForecastPoint]) -> Result<Vec<UnifiedEntry>> {
    let history_end = historical.iter().map(|b| b.week_end_date).max();
    let forecast_start = forecast.iter().map(|p| p.date).min();

    if let (Some(history_end), Some(forecast_start)) = (history_end, forecast_start) {
        if forecast_start < history_end {
            return Err(SalesError::DisjointSeries {
                forecast_start,
                history_end,
            });
        }
    }

    let mut merged: BTreeMap<NaiveDate, UnifiedEntry> = BTreeMap::new();

    for bucket in historical {
        merged.insert(
            bucket.week_end_date,
            UnifiedEntry::historical(bucket.week_end_date, bucket.total_amount),
        );
    }

    for point in forecast {
        let entry = match merged.get(&point.date).and_then(|e| e.actual) {
            Some(actual) => UnifiedEntry::boundary(actual, point),
            None => UnifiedEntry::forecast(point),
        };
        merged.insert(point.date, entry);
    }

    Ok(merged.into_values().collect())
}

/// Keep the provider points dated on or after the last historical week
///
/// Providers report in-sample fits alongside the forecast; only the tail
/// starting at the boundary goes into the chart.
pub fn forecast_tail(points: &[ForecastPoint], history_end: NaiveDate) -> Vec<ForecastPoint> {
    points
        .iter()
        .filter(|p| p.date >= history_end)
        .copied()
        .collect()
}

/// Entries of the predicted-only region
pub fn forecast_region(entries: &[UnifiedEntry]) -> Vec<UnifiedEntry> {
    entries
        .iter()
        .filter(|e| e.is_forecast_only())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundary_predicted_pinned_to_actual() {
        let history = vec![WeeklyBucket::new(date(2024, 12, 29), 100.0)];
        // The model's own estimate at the boundary differs from the actual
        let forecast = vec![ForecastPoint::new(date(2024, 12, 29), 93.0, 90.0, 110.0)];

        let entries = assemble(&history, &forecast).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_boundary());
        assert_eq!(entries[0].predicted, Some(100.0));
        assert_eq!(entries[0].lower, Some(90.0));
    }

    #[test]
    fn test_empty_sides() {
        let history = vec![WeeklyBucket::new(date(2024, 1, 7), 5.0)];
        let entries = assemble(&history, &[]).unwrap();
        assert_eq!(entries[0].actual, Some(5.0));
        assert_eq!(entries[0].predicted, None);

        let forecast = vec![ForecastPoint::new(date(2024, 1, 7), 5.0, 4.0, 6.0)];
        let entries = assemble(&[], &forecast).unwrap();
        assert!(entries[0].is_forecast_only());

        assert!(assemble(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_forecast_tail_and_region() {
        let points = vec![
            ForecastPoint::new(date(2024, 1, 7), 1.0, 0.0, 2.0),
            ForecastPoint::new(date(2024, 1, 14), 2.0, 1.0, 3.0),
            ForecastPoint::new(date(2024, 1, 21), 3.0, 2.0, 4.0),
        ];

        let tail = forecast_tail(&points, date(2024, 1, 14));
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].date, date(2024, 1, 14));

        let history = vec![
            WeeklyBucket::new(date(2024, 1, 7), 1.5),
            WeeklyBucket::new(date(2024, 1, 14), 2.5),
        ];
        let entries = assemble(&history, &tail).unwrap();
        let region = forecast_region(&entries);
        assert_eq!(region.len(), 1);
        assert_eq!(region[0].date, date(2024, 1, 21));
    }
}
