//! Bank of hours aggregation.
//!
//! This module folds the daily results over a date range into a signed
//! compensatory-hours balance: overtime credit minus owed hours. The range
//! is clipped to the employee's hire date and to today, so nothing before
//! hire is charged and nothing in the future is projected.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::TimeRecord;

use super::daily_hours::{DailyHours, calculate_daily_hours};

/// One day of the bank of hours, with the balance accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankHoursDay {
    /// The day's hours.
    #[serde(flatten)]
    pub hours: DailyHours,
    /// Balance from the effective start up to and including this day.
    pub running_balance: Decimal,
}

/// The bank of hours over a date range.
///
/// Derived, never persisted: recomputing it from the same records always
/// produces the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankHoursResult {
    /// The start date that was requested.
    pub start_date: NaiveDate,
    /// The end date that was requested.
    pub end_date: NaiveDate,
    /// First day actually counted (`None` when the clipped range is empty).
    pub effective_start: Option<NaiveDate>,
    /// Last day actually counted (`None` when the clipped range is empty).
    pub effective_end: Option<NaiveDate>,
    /// Number of days counted.
    pub days_counted: u32,
    /// Sum of premium-weighted overtime.
    pub total_overtime_hours: Decimal,
    /// Sum of owed hours.
    pub total_owed_hours: Decimal,
    /// Overtime minus owed. Positive means the company owes the employee.
    pub balance_hours: Decimal,
    /// Per-day detail, only filled when requested.
    #[serde(default)]
    pub per_day: Vec<BankHoursDay>,
}

/// Running totals for the fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BankTotals {
    overtime: Decimal,
    owed: Decimal,
    days: u32,
}

impl BankTotals {
    fn add(self, day: &DailyHours) -> Self {
        Self {
            overtime: self.overtime + day.overtime_hours,
            owed: self.owed + day.owed_hours,
            days: self.days + 1,
        }
    }

    fn balance(&self) -> Decimal {
        self.overtime - self.owed
    }
}

/// Clips `[start, end]` to `[hire_date, today]`.
///
/// Returns `None` when nothing of the range remains.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::effective_range;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// assert_eq!(
///     effective_range(d(3, 5), d(3, 1), d(3, 31), d(3, 20)),
///     Some((d(3, 5), d(3, 20)))
/// );
/// assert_eq!(effective_range(d(4, 1), d(3, 1), d(3, 31), d(5, 1)), None);
/// ```
pub fn effective_range(
    hire_date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let effective_start = start.max(hire_date);
    let effective_end = end.min(today);
    (effective_start <= effective_end).then_some((effective_start, effective_end))
}

/// Calculates the bank of hours for a range of days.
///
/// `records` is the single batched fetch for the range; it may contain
/// records outside the range, which are ignored. Each day in the clipped
/// range is evaluated with [`calculate_daily_hours`] and the results are
/// folded into the totals.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `start` is after `end`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_bank_hours;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
/// // Monday to Sunday without a single punch: 44 hours owed.
/// let result = calculate_bank_hours(&[], d(1), d(9), d(15), d(31), false).unwrap();
/// assert_eq!(result.total_owed_hours, Decimal::new(44, 0));
/// assert_eq!(result.balance_hours, Decimal::new(-44, 0));
/// ```
pub fn calculate_bank_hours(
    records: &[TimeRecord],
    hire_date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    detailed: bool,
) -> EngineResult<BankHoursResult> {
    if start > end {
        return Err(EngineError::validation(
            "start_date",
            format!("start date {} is after end date {}", start, end),
        ));
    }

    let Some((effective_start, effective_end)) = effective_range(hire_date, start, end, today)
    else {
        return Ok(BankHoursResult {
            start_date: start,
            end_date: end,
            effective_start: None,
            effective_end: None,
            days_counted: 0,
            total_overtime_hours: Decimal::ZERO,
            total_owed_hours: Decimal::ZERO,
            balance_hours: Decimal::ZERO,
            per_day: Vec::new(),
        });
    };

    let mut by_day: HashMap<NaiveDate, Vec<TimeRecord>> = HashMap::new();
    for record in records {
        let date = record.date();
        if date >= effective_start && date <= effective_end {
            by_day.entry(date).or_default().push(record.clone());
        }
    }

    let days: Vec<DailyHours> = effective_start
        .iter_days()
        .take_while(|date| *date <= effective_end)
        .map(|date| {
            let day_records = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            calculate_daily_hours(day_records, date)
        })
        .collect();

    let totals = days
        .iter()
        .fold(BankTotals::default(), |totals, day| totals.add(day));

    let per_day = if detailed {
        days.into_iter()
            .scan(BankTotals::default(), |running, hours| {
                *running = running.add(&hours);
                Some(BankHoursDay {
                    running_balance: running.balance(),
                    hours,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(BankHoursResult {
        start_date: start,
        end_date: end,
        effective_start: Some(effective_start),
        effective_end: Some(effective_end),
        days_counted: totals.days,
        total_overtime_hours: totals.overtime,
        total_owed_hours: totals.owed,
        balance_hours: totals.balance(),
        per_day,
    })
}
