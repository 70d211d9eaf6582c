//! Calculation logic for the Attendance Engine.
//!
//! This module contains the pure rule functions: the calendar rule table
//! (expected hours and overtime premiums), punch sequencing, daily hours,
//! the bank of hours over a date range, CLT vacation entitlement, and the
//! filed-overtime ledger. None of them perform I/O; they work on a snapshot
//! of records fetched beforehand.

mod bank_hours;
mod calendar;
mod daily_hours;
mod overtime_balance;
mod punch_sequence;
mod vacation;

pub use bank_hours::{BankHoursDay, BankHoursResult, calculate_bank_hours, effective_range};
pub use calendar::{
    DayType, FRIDAY_HOURS, LONG_DAY_HOURS, NIGHT_PREMIUM_START_HOUR, PREMIUM_150, PREMIUM_200,
    expected_hours, get_day_type, overtime_premium,
};
pub use daily_hours::{
    DEFAULT_LUNCH_HOURS, DailyHours, DayStatus, ISSUE_DEFAULT_LUNCH, ISSUE_JUSTIFIED_ABSENCE,
    ISSUE_MISSING_ENTRY, ISSUE_MISSING_EXIT, calculate_daily_hours,
};
pub use overtime_balance::{
    COMPENSATION_WINDOW_MONTHS, calculate_overtime_balance, can_compensate, compensation_cutoff,
    validate_overtime_request,
};
pub use punch_sequence::{LocationReading, PUNCH_CLOCK_SKEW_MINUTES, next_punch, register_punch};
pub use vacation::{
    EXPIRING_NOTICE_DAYS, MAX_ACCRUED_PERIODS, calculate_vacation_balance, completed_periods,
    vacation_days, validate_vacation_request,
};
