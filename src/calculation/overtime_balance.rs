//! Filed overtime ledger.
//!
//! Approved overtime may be compensated with time off for six months after
//! the day it was worked. This ledger is independent of the bank of hours.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComplianceWarning, NewOvertimeRequest, OvertimeBalance, OvertimeRequest, OvertimeStatus,
    WarningCode,
};

/// Months during which approved overtime can be compensated.
pub const COMPENSATION_WINDOW_MONTHS: u32 = 6;

/// Oldest overtime date still compensable on `as_of`.
pub fn compensation_cutoff(as_of: NaiveDate) -> NaiveDate {
    as_of
        .checked_sub_months(Months::new(COMPENSATION_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

fn sum_hours<'a>(requests: impl Iterator<Item = &'a OvertimeRequest>) -> Decimal {
    requests.map(|r| r.hours).sum()
}

/// Computes the filed-overtime balance on `as_of`.
///
/// `available_hours` is approved minus pending hours. Only approved requests
/// inside the compensation window are eligible; the deadline is six months
/// after the oldest of them. Approved hours outside the window are reported
/// as expired with a warning.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_overtime_balance;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let balance = calculate_overtime_balance(&[], NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
/// assert_eq!(balance.available_hours, Decimal::ZERO);
/// assert_eq!(balance.compensation_deadline, None);
/// ```
pub fn calculate_overtime_balance(requests: &[OvertimeRequest], as_of: NaiveDate) -> OvertimeBalance {
    let cutoff = compensation_cutoff(as_of);
    let approved = || {
        requests
            .iter()
            .filter(|r| r.status == OvertimeStatus::Approved)
    };

    let approved_hours = sum_hours(approved());
    let pending_hours = sum_hours(
        requests
            .iter()
            .filter(|r| r.status == OvertimeStatus::Pending),
    );
    let eligible_hours = sum_hours(approved().filter(|r| r.date >= cutoff));
    let expired_hours = approved_hours - eligible_hours;

    let compensation_deadline = approved()
        .filter(|r| r.date >= cutoff)
        .map(|r| r.date)
        .min()
        .and_then(|oldest| oldest.checked_add_months(Months::new(COMPENSATION_WINDOW_MONTHS)));

    let warnings = if expired_hours > Decimal::ZERO {
        vec![ComplianceWarning::on(
            WarningCode::OvertimeExpired,
            cutoff,
            format!(
                "{} approved overtime hours were worked before {} and can no longer be compensated",
                expired_hours.normalize(),
                cutoff
            ),
        )]
    } else {
        Vec::new()
    };

    OvertimeBalance {
        as_of,
        approved_hours,
        pending_hours,
        available_hours: approved_hours - pending_hours,
        eligible_hours,
        expired_hours,
        compensation_deadline,
        warnings,
    }
}

/// Returns true if `hours` of time off can be compensated on `as_of`.
///
/// Eligible approved hours minus pending hours must cover the amount.
pub fn can_compensate(requests: &[OvertimeRequest], hours: Decimal, as_of: NaiveDate) -> bool {
    if hours <= Decimal::ZERO {
        return false;
    }
    let balance = calculate_overtime_balance(requests, as_of);
    balance.eligible_hours - balance.pending_hours >= hours
}

/// Checks a new overtime request before it is filed.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when hours are not positive, exceed
/// `max_hours`, or the date is after `today`.
pub fn validate_overtime_request(
    request: &NewOvertimeRequest,
    max_hours: Decimal,
    today: NaiveDate,
) -> EngineResult<()> {
    if request.hours <= Decimal::ZERO {
        return Err(EngineError::validation("hours", "must be positive"));
    }
    if request.hours > max_hours {
        return Err(EngineError::validation(
            "hours",
            format!(
                "{} hours exceeds the daily maximum of {}",
                request.hours.normalize(),
                max_hours.normalize()
            ),
        ));
    }
    if request.date > today {
        return Err(EngineError::validation(
            "date",
            format!("overtime cannot be filed for the future date {}", request.date),
        ));
    }
    Ok(())
}
