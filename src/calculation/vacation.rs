//! Vacation entitlement under CLT acquisitive/concessive periods.
//!
//! Each complete 12-month acquisitive period after hire earns the annual
//! entitlement. The days must be taken within the following 12-month
//! concessive period; days left unused past that deadline are a compliance
//! violation and are reported, never dropped.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComplianceWarning, VacationBalance, VacationRequest, VacationStatus, WarningCode,
};

/// Accrual never exceeds this many annual entitlements.
pub const MAX_ACCRUED_PERIODS: u32 = 2;

/// Days before a concessive deadline at which an expiring warning is raised.
pub const EXPIRING_NOTICE_DAYS: i64 = 30;

/// `date` plus a whole number of years, clamping Feb 29 to Feb 28.
fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of complete acquisitive periods between `hire_date` and `as_of`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::completed_periods;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(completed_periods(hire, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()), 0);
/// assert_eq!(completed_periods(hire, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()), 1);
/// ```
pub fn completed_periods(hire_date: NaiveDate, as_of: NaiveDate) -> u32 {
    let mut years = u32::try_from(as_of.year() - hire_date.year()).unwrap_or(0);
    while years > 0 && add_years(hire_date, years) > as_of {
        years -= 1;
    }
    years
}

/// Counts the Monday to Friday dates in `[start, end]`.
///
/// Returns 0 when `end` is before `start`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::vacation_days;
/// use chrono::NaiveDate;
///
/// // Monday 2026-03-09 to Sunday 2026-03-22: two working weeks.
/// let start = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 22).unwrap();
/// assert_eq!(vacation_days(start, end), 10);
/// ```
pub fn vacation_days(start: NaiveDate, end: NaiveDate) -> i64 {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}

/// Sums the days of annual requests with `status`.
fn annual_days(requests: &[VacationRequest], status: VacationStatus) -> i64 {
    requests
        .iter()
        .filter(|r| r.is_annual_with(status))
        .map(|r| r.days)
        .sum()
}

/// Computes an employee's vacation balance on `as_of`.
///
/// - `total_days` = complete periods × `days_per_year`, capped at two periods
/// - `used_days` / `pending_days` = approved / pending annual requests
/// - `available_days` = lifetime accrual − used, floored at zero and capped
///   at `total_days`
/// - `next_vacation_date` = end of the acquisitive period in progress
/// - `expires_at` = concessive deadline of the oldest period still holding
///   unused days, or of the period in progress when nothing is unused
///
/// Unused days past their deadline, a deadline within
/// [`EXPIRING_NOTICE_DAYS`], and more approved days than accrued are all
/// reported in `warnings`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_vacation_balance;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// let balance = calculate_vacation_balance(hire, as_of, &[], 30);
/// assert_eq!(balance.total_days, 60);
/// assert_eq!(balance.available_days, 60);
/// ```
pub fn calculate_vacation_balance(
    hire_date: NaiveDate,
    as_of: NaiveDate,
    requests: &[VacationRequest],
    days_per_year: u32,
) -> VacationBalance {
    let per_period = i64::from(days_per_year);
    let years_worked = completed_periods(hire_date, as_of);
    let accrued_days = i64::from(years_worked) * per_period;
    let total_days = i64::from(years_worked.min(MAX_ACCRUED_PERIODS)) * per_period;

    let used_days = annual_days(requests, VacationStatus::Approved);
    let pending_days = annual_days(requests, VacationStatus::Pending);

    let mut warnings = Vec::new();

    if used_days > accrued_days {
        warnings.push(ComplianceWarning::on(
            WarningCode::VacationOverdrawn,
            as_of,
            format!(
                "{} vacation days approved but only {} accrued",
                used_days, accrued_days
            ),
        ));
    }
    // Days taken are charged against lifetime accrual; only the outstanding
    // remainder is subject to the two-period cap.
    let outstanding_days = (accrued_days - used_days).max(0);
    let available_days = outstanding_days.min(total_days);

    let open_periods = if per_period > 0 {
        u32::try_from((outstanding_days + per_period - 1) / per_period).unwrap_or(0)
    } else {
        0
    };
    let oldest_open_period = years_worked.saturating_sub(open_periods);
    let expires_at = add_years(hire_date, oldest_open_period + 2);

    if outstanding_days > 0 {
        let oldest_period_days =
            outstanding_days - i64::from(open_periods.saturating_sub(1)) * per_period;
        let days_left = (expires_at - as_of).num_days();
        if as_of > expires_at {
            warnings.push(ComplianceWarning::on(
                WarningCode::VacationExpired,
                expires_at,
                format!(
                    "{} vacation days were not granted before the concessive deadline {}",
                    oldest_period_days, expires_at
                ),
            ));
        } else if days_left <= EXPIRING_NOTICE_DAYS {
            warnings.push(ComplianceWarning::on(
                WarningCode::VacationExpiring,
                expires_at,
                format!(
                    "{} vacation days must be granted within {} days",
                    oldest_period_days, days_left
                ),
            ));
        }
    }

    VacationBalance {
        as_of,
        years_worked,
        total_days,
        used_days,
        available_days,
        pending_days,
        next_vacation_date: add_years(hire_date, years_worked + 1),
        expires_at,
        warnings,
    }
}

/// Checks a vacation request against a balance and returns its day count.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when the range is inverted, holds no
/// weekday, or asks for more than the available days not already pending.
pub fn validate_vacation_request(
    balance: &VacationBalance,
    start: NaiveDate,
    end: NaiveDate,
) -> EngineResult<i64> {
    if start > end {
        return Err(EngineError::validation(
            "end_date",
            format!("end date {} is before start date {}", end, start),
        ));
    }

    let days = vacation_days(start, end);
    if days == 0 {
        return Err(EngineError::validation(
            "start_date",
            "the requested range contains no working day",
        ));
    }

    let requestable = (balance.available_days - balance.pending_days).max(0);
    if days > requestable {
        return Err(EngineError::validation(
            "days",
            format!(
                "{} days requested but only {} can be requested",
                days, requestable
            ),
        ));
    }

    Ok(days)
}
