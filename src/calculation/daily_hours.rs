//! Daily hours calculation.
//!
//! This module turns one day's punches into worked, regular, overtime and
//! owed hours. It never fails: missing data produces zeroed hours and an
//! issue note instead.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{RecordType, TimeRecord};

use super::calendar::{DayType, expected_hours, get_day_type, overtime_premium};

/// Issue note for a certificate-backed day off.
pub const ISSUE_JUSTIFIED_ABSENCE: &str = "Ausência Justificada";

/// Issue note when the day has no ENTRY.
pub const ISSUE_MISSING_ENTRY: &str = "Entrada não registrada";

/// Issue note when the day has no EXIT.
pub const ISSUE_MISSING_EXIT: &str = "Saída não registrada";

/// Issue note when the lunch break was not punched and 1h was assumed.
pub const ISSUE_DEFAULT_LUNCH: &str = "Intervalo de almoço não registrado (1h considerada)";

/// Lunch assumed when LUNCH_START or LUNCH_END is missing.
pub const DEFAULT_LUNCH_HOURS: Decimal = Decimal::from_parts(1, 0, 0, false, 0);

/// How a day was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// ENTRY and EXIT were both punched.
    Worked,
    /// A justified absence credits the expected hours.
    JustifiedAbsence,
    /// ENTRY or EXIT is missing; the day counts as an absence.
    MissingPunches,
    /// No expected hours and nothing punched.
    RestDay,
}

/// The hours computed for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHours {
    /// The calendar day.
    pub date: NaiveDate,
    /// Weekday, Saturday or Sunday.
    pub day_type: DayType,
    /// How the day was classified.
    pub status: DayStatus,
    /// Hours the calendar expects on this day.
    pub expected_hours: Decimal,
    /// Hours worked (or credited, for a justified absence).
    pub worked_hours: Decimal,
    /// Worked hours up to the expected amount.
    pub regular_hours: Decimal,
    /// Hours beyond the expected amount, before the premium.
    pub raw_overtime_hours: Decimal,
    /// Raw overtime multiplied by the premium.
    pub overtime_hours: Decimal,
    /// Expected hours not worked.
    pub owed_hours: Decimal,
    /// Length of the lunch break (punched or assumed).
    pub lunch_hours: Decimal,
    /// The premium applied to overtime, when there was any.
    pub premium: Option<Decimal>,
    /// Notes about missing or assumed data.
    pub issues: Vec<String>,
}

impl DailyHours {
    fn absent(date: NaiveDate, status: DayStatus, issues: Vec<String>) -> Self {
        let expected = expected_hours(date);
        Self {
            date,
            day_type: get_day_type(date),
            status,
            expected_hours: expected,
            worked_hours: Decimal::ZERO,
            regular_hours: Decimal::ZERO,
            raw_overtime_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            owed_hours: expected,
            lunch_hours: Decimal::ZERO,
            premium: None,
            issues,
        }
    }
}

/// Returns the number of hours between two datetimes, at second precision.
fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let duration_seconds = (end - start).num_seconds();
    Decimal::new(duration_seconds, 0) / Decimal::new(3600, 0)
}

/// Earliest valid record of `record_type` on `date`.
fn find_punch(records: &[TimeRecord], date: NaiveDate, record_type: RecordType) -> Option<NaiveDateTime> {
    records
        .iter()
        .filter(|r| r.is_active(record_type) && r.date() == date)
        .map(|r| r.timestamp)
        .min()
}

/// Calculates the hours for one day from its records.
///
/// # Rules
///
/// - A justified absence credits the expected hours: no overtime, nothing owed.
/// - A missing ENTRY or EXIT makes the day a full absence (owed = expected).
/// - Otherwise worked = (EXIT − ENTRY) − lunch, floored at zero; lunch is
///   LUNCH_END − LUNCH_START, or 1h when either is missing.
/// - Hours beyond the expected amount are overtime, multiplied by the
///   premium for the ENTRY time. On weekends every worked hour is overtime.
///
/// Records on other days and voided records are ignored.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_daily_hours;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// // No records on a Tuesday: a full day is owed.
/// let tuesday = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let hours = calculate_daily_hours(&[], tuesday);
/// assert_eq!(hours.worked_hours, Decimal::ZERO);
/// assert_eq!(hours.owed_hours, Decimal::new(9, 0));
/// ```
pub fn calculate_daily_hours(records: &[TimeRecord], date: NaiveDate) -> DailyHours {
    let expected = expected_hours(date);

    if records
        .iter()
        .any(|r| r.is_active(RecordType::AbsenceJustified) && r.date() == date)
    {
        return DailyHours {
            worked_hours: expected,
            regular_hours: expected,
            owed_hours: Decimal::ZERO,
            ..DailyHours::absent(
                date,
                DayStatus::JustifiedAbsence,
                vec![ISSUE_JUSTIFIED_ABSENCE.to_string()],
            )
        };
    }

    let entry = find_punch(records, date, RecordType::Entry);
    let exit = find_punch(records, date, RecordType::Exit);

    let (entry, exit) = match (entry, exit) {
        (Some(entry), Some(exit)) => (entry, exit),
        (None, None) if expected.is_zero() => {
            return DailyHours::absent(date, DayStatus::RestDay, Vec::new());
        }
        (entry, exit) => {
            let issues = [
                entry.is_none().then_some(ISSUE_MISSING_ENTRY),
                exit.is_none().then_some(ISSUE_MISSING_EXIT),
            ]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
            return DailyHours::absent(date, DayStatus::MissingPunches, issues);
        }
    };

    let mut issues = Vec::new();

    let lunch_hours = match (
        find_punch(records, date, RecordType::LunchStart),
        find_punch(records, date, RecordType::LunchEnd),
    ) {
        (Some(start), Some(end)) => hours_between(start, end).max(Decimal::ZERO),
        _ => {
            issues.push(ISSUE_DEFAULT_LUNCH.to_string());
            DEFAULT_LUNCH_HOURS
        }
    };

    let worked_hours = (hours_between(entry, exit) - lunch_hours).max(Decimal::ZERO);

    let (regular_hours, raw_overtime_hours, owed_hours) = if worked_hours >= expected {
        (expected, worked_hours - expected, Decimal::ZERO)
    } else {
        (worked_hours, Decimal::ZERO, expected - worked_hours)
    };

    let premium = (raw_overtime_hours > Decimal::ZERO)
        .then(|| overtime_premium(entry, date.weekday()));
    let overtime_hours = premium
        .map(|p| raw_overtime_hours * p)
        .unwrap_or(Decimal::ZERO);

    DailyHours {
        date,
        day_type: get_day_type(date),
        status: DayStatus::Worked,
        expected_hours: expected,
        worked_hours,
        regular_hours,
        raw_overtime_hours,
        overtime_hours,
        owed_hours,
        lunch_hours,
        premium,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTimeRecord;
    use std::str::FromStr;
    use uuid::Uuid;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(record_type: RecordType, date: &str, time: &str) -> TimeRecord {
        NewTimeRecord {
            employee_id: "emp_001".to_string(),
            record_type,
            timestamp: make_datetime(date, time),
            reason: None,
            observation: None,
            food_voucher_amount: Decimal::ZERO,
            transport_voucher_amount: Decimal::ZERO,
        }
        .into_record(Uuid::new_v4())
    }

    fn day(date: &str, entry: &str, lunch_start: &str, lunch_end: &str, exit: &str) -> Vec<TimeRecord> {
        vec![
            record(RecordType::Entry, date, entry),
            record(RecordType::LunchStart, date, lunch_start),
            record(RecordType::LunchEnd, date, lunch_end),
            record(RecordType::Exit, date, exit),
        ]
    }

    // 2026-03-10 is a Tuesday
    #[test]
    fn test_tuesday_half_hour_overtime() {
        let records = day("2026-03-10", "07:00:00", "12:00:00", "13:00:00", "17:30:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));

        assert_eq!(hours.status, DayStatus::Worked);
        assert_eq!(hours.worked_hours, dec("9.5"));
        assert_eq!(hours.regular_hours, dec("9"));
        assert_eq!(hours.raw_overtime_hours, dec("0.5"));
        assert_eq!(hours.premium, Some(dec("1.5")));
        assert_eq!(hours.overtime_hours, dec("0.75"));
        assert_eq!(hours.owed_hours, Decimal::ZERO);
        assert_eq!(hours.lunch_hours, dec("1"));
        assert!(hours.issues.is_empty());
    }

    // 2026-03-15 is a Sunday
    #[test]
    fn test_sunday_all_hours_are_double_overtime() {
        let records = day("2026-03-15", "07:00:00", "12:00:00", "13:00:00", "17:30:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-15"));

        assert_eq!(hours.expected_hours, Decimal::ZERO);
        assert_eq!(hours.regular_hours, Decimal::ZERO);
        assert_eq!(hours.overtime_hours, dec("19"));
        assert_eq!(hours.owed_hours, Decimal::ZERO);
    }

    // 2026-03-14 is a Saturday
    #[test]
    fn test_saturday_overtime_at_150() {
        let records = day("2026-03-14", "08:00:00", "12:00:00", "12:30:00", "12:30:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-14"));

        assert_eq!(hours.worked_hours, dec("4"));
        assert_eq!(hours.overtime_hours, dec("6"));
        assert_eq!(hours.day_type, DayType::Saturday);
    }

    #[test]
    fn test_entry_only_is_full_absence() {
        let records = vec![record(RecordType::Entry, "2026-03-10", "08:00:00")];
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));

        assert_eq!(hours.status, DayStatus::MissingPunches);
        assert_eq!(hours.worked_hours, Decimal::ZERO);
        assert_eq!(hours.owed_hours, dec("9"));
        assert_eq!(hours.issues, vec![ISSUE_MISSING_EXIT.to_string()]);
    }

    #[test]
    fn test_exit_only_notes_missing_entry() {
        let records = vec![record(RecordType::Exit, "2026-03-13", "17:00:00")];
        let hours = calculate_daily_hours(&records, make_date("2026-03-13"));

        assert_eq!(hours.owed_hours, dec("8"));
        assert_eq!(hours.issues, vec![ISSUE_MISSING_ENTRY.to_string()]);
    }

    #[test]
    fn test_empty_weekday_notes_both_punches() {
        let hours = calculate_daily_hours(&[], make_date("2026-03-10"));
        assert_eq!(hours.issues.len(), 2);
        assert_eq!(hours.owed_hours, dec("9"));
    }

    #[test]
    fn test_empty_weekend_is_rest_day() {
        let hours = calculate_daily_hours(&[], make_date("2026-03-14"));
        assert_eq!(hours.status, DayStatus::RestDay);
        assert_eq!(hours.owed_hours, Decimal::ZERO);
        assert!(hours.issues.is_empty());
    }

    #[test]
    fn test_justified_absence_credits_expected_hours() {
        let records = vec![record(RecordType::AbsenceJustified, "2026-03-13", "08:00:00")];
        let hours = calculate_daily_hours(&records, make_date("2026-03-13"));

        assert_eq!(hours.status, DayStatus::JustifiedAbsence);
        assert_eq!(hours.worked_hours, dec("8"));
        assert_eq!(hours.overtime_hours, Decimal::ZERO);
        assert_eq!(hours.owed_hours, Decimal::ZERO);
        assert_eq!(hours.issues, vec![ISSUE_JUSTIFIED_ABSENCE.to_string()]);
    }

    #[test]
    fn test_justified_absence_wins_over_punches() {
        let mut records = day("2026-03-10", "07:00:00", "12:00:00", "13:00:00", "21:00:00");
        records.push(record(RecordType::AbsenceJustified, "2026-03-10", "08:00:00"));
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));

        assert_eq!(hours.worked_hours, dec("9"));
        assert_eq!(hours.overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_missing_lunch_defaults_to_one_hour() {
        let records = vec![
            record(RecordType::Entry, "2026-03-10", "08:00:00"),
            record(RecordType::Exit, "2026-03-10", "17:00:00"),
        ];
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));

        assert_eq!(hours.lunch_hours, dec("1"));
        assert_eq!(hours.worked_hours, dec("8"));
        assert_eq!(hours.owed_hours, dec("1"));
        assert_eq!(hours.issues, vec![ISSUE_DEFAULT_LUNCH.to_string()]);
    }

    #[test]
    fn test_short_day_owes_difference() {
        let records = day("2026-03-10", "09:00:00", "12:00:00", "13:00:00", "15:30:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));

        assert_eq!(hours.worked_hours, dec("5.5"));
        assert_eq!(hours.regular_hours, dec("5.5"));
        assert_eq!(hours.owed_hours, dec("3.5"));
        assert_eq!(hours.overtime_hours, Decimal::ZERO);
        assert_eq!(hours.premium, None);
    }

    #[test]
    fn test_late_entry_short_day_has_no_overtime() {
        let records = vec![
            record(RecordType::Entry, "2026-03-13", "22:00:00"),
            record(RecordType::LunchStart, "2026-03-13", "22:30:00"),
            record(RecordType::LunchEnd, "2026-03-13", "22:30:00"),
            record(RecordType::Exit, "2026-03-13", "23:59:59"),
        ];
        let hours = calculate_daily_hours(&records, make_date("2026-03-13"));
        assert_eq!(hours.overtime_hours, Decimal::ZERO);
        assert!(hours.owed_hours > Decimal::ZERO);
    }

    #[test]
    fn test_exit_before_entry_floors_at_zero() {
        let records = day("2026-03-10", "17:00:00", "12:00:00", "13:00:00", "08:00:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));
        assert_eq!(hours.worked_hours, Decimal::ZERO);
        assert_eq!(hours.owed_hours, dec("9"));
    }

    #[test]
    fn test_voided_exit_is_ignored() {
        let mut records = day("2026-03-10", "07:00:00", "12:00:00", "13:00:00", "17:30:00");
        records[3].is_valid = false;
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));
        assert_eq!(hours.status, DayStatus::MissingPunches);
    }

    #[test]
    fn test_other_days_records_ignored() {
        let records = day("2026-03-09", "07:00:00", "12:00:00", "13:00:00", "17:30:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));
        assert_eq!(hours.status, DayStatus::MissingPunches);
    }

    #[test]
    fn test_fractional_minutes() {
        let records = day("2026-03-10", "08:00:00", "12:00:00", "13:00:00", "18:20:00");
        let hours = calculate_daily_hours(&records, make_date("2026-03-10"));
        // 9h20m worked: 20 minutes overtime at 1.5 = 0.5h
        assert_eq!(hours.raw_overtime_hours.round_dp(6), dec("0.333333"));
        assert_eq!(hours.overtime_hours.round_dp(6), dec("0.5"));
    }
}
