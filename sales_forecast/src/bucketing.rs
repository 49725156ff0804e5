//! Weekly bucketing of transaction records
//!
//! Every record is assigned to the calendar week that contains it, keyed by
//! the date that week ends on. Weeks end on a fixed weekday (Sunday unless
//! told otherwise), so a record dated on the closing weekday belongs to the
//! week ending that same day.

use crate::data::Transaction;
use crate::error::{Result, SalesError};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Weekday the buckets close on when none is given
pub const DEFAULT_WEEK_END: Weekday = Weekday::Sun;

/// Summed amounts of one calendar week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    /// Last day of the week
    pub week_end_date: NaiveDate,
    /// Sum of the amounts recorded in the week
    pub total_amount: f64,
    /// Number of records that contributed, zero for synthesized weeks
    pub record_count: usize,
}

impl WeeklyBucket {
    pub fn new(week_end_date: NaiveDate, total_amount: f64) -> Self {
        Self {
            week_end_date,
            total_amount,
            record_count: 0,
        }
    }

    /// ISO year of the week
    pub fn iso_year(&self) -> i32 {
        self.week_end_date.iso_week().year()
    }

    /// ISO week number, 1..=53
    pub fn iso_week(&self) -> u32 {
        self.week_end_date.iso_week().week()
    }

    /// Label such as `2024-W01`
    pub fn iso_week_label(&self) -> String {
        format!("{}-W{:02}", self.iso_year(), self.iso_week())
    }
}

/// Date the week containing `date` ends on
///
/// Fails when that date lies past the last date chrono can represent.
pub fn week_end_date(date: NaiveDate, week_end: Weekday) -> Result<NaiveDate> {
    let target = week_end.num_days_from_monday();
    let current = date.weekday().num_days_from_monday();
    let offset = (target + 7 - current) % 7;
    date.checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| SalesError::ParseError(format!("week containing {} ends out of range", date)))
}

/// `date` moved forward by `weeks` whole weeks
pub(crate) fn add_weeks(date: NaiveDate, weeks: u64) -> Result<NaiveDate> {
    weeks
        .checked_mul(7)
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or_else(|| SalesError::ParseError(format!("{} weeks after {} is out of range", weeks, date)))
}

/// Bucket records into weeks ending on Sunday
pub fn bucket_weekly(records: &[Transaction]) -> Result<Vec<WeeklyBucket>> {
    bucket_weekly_ending(records, DEFAULT_WEEK_END)
}

/// Bucket records into weeks ending on `week_end`
///
/// Records with a negative or non-finite amount are skipped. Weeks without
/// any record are not synthesized; see [`fill_missing_weeks`].
pub fn bucket_weekly_ending(records: &[Transaction], week_end: Weekday) -> Result<Vec<WeeklyBucket>> {
    let mut weeks: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records {
        if !record.amount.is_finite() || record.amount < 0.0 {
            dropped += 1;
            continue;
        }

        let key = week_end_date(record.timestamp, week_end)?;
        let slot = weeks.entry(key).or_insert((0.0, 0));
        slot.0 += record.amount;
        slot.1 += 1;
    }

    if dropped > 0 {
        debug!(dropped, "skipped records with negative or non-finite amounts");
    }

    if weeks.is_empty() {
        return Err(SalesError::EmptyInput(format!(
            "no valid records to bucket ({} supplied, {} filtered out)",
            records.len(),
            dropped
        )));
    }

    debug!(weeks = weeks.len(), "records bucketed by week");

    Ok(weeks
        .into_iter()
        .map(|(week_end_date, (total_amount, record_count))| WeeklyBucket {
            week_end_date,
            total_amount,
            record_count,
        })
        .collect())
}

/// Insert zero-valued buckets for every week missing between the first and
/// the last bucket
///
/// Input must be strictly increasing by date and aligned on one weekday.
pub fn fill_missing_weeks(buckets: &[WeeklyBucket]) -> Result<Vec<WeeklyBucket>> {
    let mut filled = Vec::with_capacity(buckets.len());

    for bucket in buckets {
        let previous = filled.last().map(|b: &WeeklyBucket| b.week_end_date);
        if let Some(previous) = previous {
            let mut next = add_weeks(previous, 1)?;
            while next < bucket.week_end_date {
                filled.push(WeeklyBucket::new(next, 0.0));
                next = add_weeks(next, 1)?;
            }
        }
        filled.push(*bucket);
    }

    if filled.len() > buckets.len() {
        debug!(
            synthesized = filled.len() - buckets.len(),
            "filled gap weeks with zero totals"
        );
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_end_date_sunday() {
        // 2024-01-02 is a Tuesday
        assert_eq!(week_end_date(date(2024, 1, 2), Weekday::Sun).unwrap(), date(2024, 1, 7));
        // A Sunday closes its own week
        assert_eq!(week_end_date(date(2024, 1, 7), Weekday::Sun).unwrap(), date(2024, 1, 7));
        assert_eq!(week_end_date(date(2024, 1, 8), Weekday::Sun).unwrap(), date(2024, 1, 14));
    }

    #[test]
    fn test_week_end_date_other_weekday() {
        assert_eq!(week_end_date(date(2024, 1, 2), Weekday::Sat).unwrap(), date(2024, 1, 6));
        assert_eq!(week_end_date(date(2024, 1, 7), Weekday::Sat).unwrap(), date(2024, 1, 13));
        assert_eq!(week_end_date(date(2024, 1, 2), Weekday::Tue).unwrap(), date(2024, 1, 2));
    }

    #[test]
    fn test_week_end_past_last_date() {
        let result = week_end_date(NaiveDate::MAX, NaiveDate::MAX.weekday().succ());
        assert!(matches!(result, Err(SalesError::ParseError(_))));

        // The closing weekday itself needs no arithmetic
        assert_eq!(
            week_end_date(NaiveDate::MAX, NaiveDate::MAX.weekday()).unwrap(),
            NaiveDate::MAX
        );
        assert!(add_weeks(NaiveDate::MAX, 1).is_err());
        assert!(add_weeks(date(2024, 1, 7), u64::MAX).is_err());
    }

    #[test]
    fn test_iso_week_label() {
        let bucket = WeeklyBucket::new(date(2024, 1, 7), 1.0);
        assert_eq!(bucket.iso_week_label(), "2024-W01");

        // Belongs to the last ISO week of 2020
        let bucket = WeeklyBucket::new(date(2021, 1, 3), 1.0);
        assert_eq!(bucket.iso_week_label(), "2020-W53");
    }

    #[test]
    fn test_fill_missing_weeks() {
        let buckets = vec![
            WeeklyBucket::new(date(2024, 1, 7), 10.0),
            WeeklyBucket::new(date(2024, 1, 28), 4.0),
        ];

        let filled = fill_missing_weeks(&buckets).unwrap();
        let dates: Vec<_> = filled.iter().map(|b| b.week_end_date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 7), date(2024, 1, 14), date(2024, 1, 21), date(2024, 1, 28)]
        );
        assert_eq!(filled[1].total_amount, 0.0);
        assert_eq!(filled[1].record_count, 0);
        assert_eq!(filled[3].total_amount, 4.0);

        assert!(fill_missing_weeks(&[]).unwrap().is_empty());
    }
}
