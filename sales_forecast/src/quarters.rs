//! Calendar quarter rollups of forecast totals

use crate::assembler::UnifiedEntry;
use crate::error::{Result, SalesError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Predicted total of one calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRollup {
    pub year: i32,
    /// 1..=4
    pub quarter: u32,
    pub total_predicted: f64,
}

impl fmt::Display for QuarterlyRollup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// What to do with quarters whose predicted total sums to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroQuarterPolicy {
    #[default]
    Drop,
    Retain,
}

/// Calendar quarter of `date`: Jan-Mar is 1, Oct-Dec is 4
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Sum predicted values per calendar quarter, dropping zero totals
pub fn aggregate_quarters(forecast_entries: &[UnifiedEntry]) -> Result<Vec<QuarterlyRollup>> {
    aggregate_quarters_with(forecast_entries, ZeroQuarterPolicy::Drop)
}

/// Sum predicted values per calendar quarter
///
/// Every entry must carry a predicted value; pass the predicted-only region
/// of a unified series.
pub fn aggregate_quarters_with(
    forecast_entries: &[UnifiedEntry],
    policy: ZeroQuarterPolicy,
) -> Result<Vec<QuarterlyRollup>> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for entry in forecast_entries {
        let predicted = entry.predicted.ok_or_else(|| SalesError::InvalidEntry {
            date: entry.date,
            reason: "forecast entry has no predicted value".to_string(),
        })?;

        *totals
            .entry((entry.date.year(), quarter_of(entry.date)))
            .or_insert(0.0) += predicted;
    }

    Ok(totals
        .into_iter()
        .filter(|(_, total)| policy == ZeroQuarterPolicy::Retain || *total != 0.0)
        .map(|((year, quarter), total_predicted)| QuarterlyRollup {
            year,
            quarter,
            total_predicted,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_of() {
        assert_eq!(quarter_of(date(2025, 1, 1)), 1);
        assert_eq!(quarter_of(date(2025, 3, 31)), 1);
        assert_eq!(quarter_of(date(2025, 4, 1)), 2);
        assert_eq!(quarter_of(date(2025, 9, 30)), 3);
        assert_eq!(quarter_of(date(2025, 12, 31)), 4);
    }

    #[test]
    fn test_display() {
        let rollup = QuarterlyRollup {
            year: 2025,
            quarter: 3,
            total_predicted: 1.0,
        };
        assert_eq!(rollup.to_string(), "2025-Q3");
    }
}
