//! Per-day summary with punctuality.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::calculation::{DailyHours, calculate_daily_hours, next_punch};
use crate::config::CompanySettings;
use crate::models::{RecordType, TimeRecord};

/// Everything known about one employee's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// The employee.
    pub employee_id: String,
    /// The business-local day.
    pub date: NaiveDate,
    /// Valid records of the day in timestamp order.
    pub records: Vec<TimeRecord>,
    /// Hours computed from the records.
    pub hours: DailyHours,
    /// The punch the day expects next, `None` once complete.
    pub next_punch: Option<RecordType>,
    /// Minutes the ENTRY came after the tolerated start.
    pub late_minutes: i64,
    /// Minutes the EXIT came before the tolerated end.
    pub early_leave_minutes: i64,
}

fn punch_time(records: &[TimeRecord], record_type: RecordType) -> Option<NaiveDateTime> {
    records
        .iter()
        .find(|r| r.is_active(record_type))
        .map(|r| r.timestamp)
}

fn minutes_after(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (later - earlier).num_minutes().max(0)
}

/// Builds the summary of `date` from that day's records.
///
/// Lateness is only measured on days that expect work; it never changes
/// the computed hours.
pub fn summarize_day(
    employee_id: &str,
    date: NaiveDate,
    records: Vec<TimeRecord>,
    settings: &CompanySettings,
) -> DailySummary {
    let hours = calculate_daily_hours(&records, date);
    let next = next_punch(&records, date);

    let tolerance = TimeDelta::minutes(i64::from(settings.tolerance_minutes));
    let at = |time: NaiveTime| date.and_time(time);

    let (late_minutes, early_leave_minutes) = if hours.expected_hours.is_zero() {
        (0, 0)
    } else {
        let late = punch_time(&records, RecordType::Entry)
            .map(|entry| minutes_after(entry, at(settings.work_start_time) + tolerance))
            .unwrap_or(0);
        let early = punch_time(&records, RecordType::Exit)
            .map(|exit| minutes_after(at(settings.work_end_time) - tolerance, exit))
            .unwrap_or(0);
        (late, early)
    };

    DailySummary {
        employee_id: employee_id.to_string(),
        date,
        records,
        hours,
        next_punch: next,
        late_minutes,
        early_leave_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTimeRecord;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(record_type: RecordType, ts: &str) -> TimeRecord {
        NewTimeRecord {
            employee_id: "emp_001".to_string(),
            record_type,
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            reason: None,
            observation: None,
            food_voucher_amount: Decimal::ZERO,
            transport_voucher_amount: Decimal::ZERO,
        }
        .into_record(Uuid::new_v4())
    }

    #[test]
    fn test_within_tolerance_is_punctual() {
        let records = vec![
            record(RecordType::Entry, "2026-03-10 08:10:00"),
            record(RecordType::LunchStart, "2026-03-10 12:00:00"),
            record(RecordType::LunchEnd, "2026-03-10 13:00:00"),
            record(RecordType::Exit, "2026-03-10 17:50:00"),
        ];
        let summary =
            summarize_day("emp_001", make_date("2026-03-10"), records, &CompanySettings::default());

        assert_eq!(summary.late_minutes, 0);
        assert_eq!(summary.early_leave_minutes, 0);
        assert_eq!(summary.next_punch, None);
    }

    #[test]
    fn test_late_entry_and_early_exit() {
        let records = vec![
            record(RecordType::Entry, "2026-03-10 08:25:00"),
            record(RecordType::LunchStart, "2026-03-10 12:00:00"),
            record(RecordType::LunchEnd, "2026-03-10 13:00:00"),
            record(RecordType::Exit, "2026-03-10 17:30:00"),
        ];
        let summary =
            summarize_day("emp_001", make_date("2026-03-10"), records, &CompanySettings::default());

        assert_eq!(summary.late_minutes, 15);
        assert_eq!(summary.early_leave_minutes, 20);
    }

    #[test]
    fn test_weekend_has_no_lateness() {
        let records = vec![record(RecordType::Entry, "2026-03-14 11:00:00")];
        let summary =
            summarize_day("emp_001", make_date("2026-03-14"), records, &CompanySettings::default());

        assert_eq!(summary.late_minutes, 0);
        assert_eq!(summary.next_punch, Some(RecordType::LunchStart));
    }
}
