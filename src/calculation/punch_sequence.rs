//! Daily punch sequencing.
//!
//! A working day accepts each punch type once, in the order
//! ENTRY → LUNCH_START → LUNCH_END → EXIT. The sequencer only decides; the
//! persistence layer makes the duplicate check atomic with the insert.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Location, NewTimeRecord, RecordType, TimeRecord};

/// How far a punch timestamp may drift from the server's "now", in minutes.
///
/// Lets a punch taken just before midnight land after the business day
/// rolls over.
pub const PUNCH_CLOCK_SKEW_MINUTES: i64 = 5;

/// What the device reported about its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationReading {
    /// No coordinates were sent.
    Missing,
    /// Coordinates were sent but are unusable.
    Invalid,
    /// Usable coordinates.
    Valid(Location),
}

impl LocationReading {
    /// Interprets optional latitude/longitude parts.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::LocationReading;
    ///
    /// assert_eq!(LocationReading::from_parts(None, None), LocationReading::Missing);
    /// assert_eq!(LocationReading::from_parts(Some(-23.5), None), LocationReading::Invalid);
    /// assert!(matches!(
    ///     LocationReading::from_parts(Some(-23.5), Some(-46.6)),
    ///     LocationReading::Valid(_)
    /// ));
    /// ```
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (None, None) => LocationReading::Missing,
            (Some(latitude), Some(longitude)) => {
                let location = Location {
                    latitude,
                    longitude,
                };
                if location.is_valid() {
                    LocationReading::Valid(location)
                } else {
                    LocationReading::Invalid
                }
            }
            _ => LocationReading::Invalid,
        }
    }

    /// Human-readable reason stored on the punch.
    pub fn reason(&self) -> String {
        match self {
            LocationReading::Missing => "Ponto registrado sem localização".to_string(),
            LocationReading::Invalid => "Ponto registrado com localização inválida".to_string(),
            LocationReading::Valid(location) => format!(
                "Ponto registrado com localização ({:.6}, {:.6})",
                location.latitude, location.longitude
            ),
        }
    }
}

/// Punch types already registered on `date`, ignoring voided records.
fn registered_on(records: &[TimeRecord], date: NaiveDate) -> Vec<RecordType> {
    records
        .iter()
        .filter(|r| r.is_valid && r.record_type.is_punch() && r.date() == date)
        .map(|r| r.record_type)
        .collect()
}

/// Returns the next punch the day expects, or `None` once all four exist.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::next_punch;
/// use attendance_engine::models::RecordType;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// assert_eq!(next_punch(&[], date), Some(RecordType::Entry));
/// ```
pub fn next_punch(records: &[TimeRecord], date: NaiveDate) -> Option<RecordType> {
    let registered = registered_on(records, date);
    RecordType::PUNCH_SEQUENCE
        .into_iter()
        .find(|t| !registered.contains(t))
}

/// Rejects punches that are not for the current business day.
///
/// A timestamp more than [`PUNCH_CLOCK_SKEW_MINUTES`] ahead of `now` is in
/// the future. A timestamp on another day is only accepted while it is
/// within the skew window of `now`.
fn check_punch_day(timestamp: NaiveDateTime, now: NaiveDateTime) -> EngineResult<()> {
    let skew = TimeDelta::minutes(PUNCH_CLOCK_SKEW_MINUTES);

    if timestamp > now + skew {
        return Err(EngineError::validation(
            "timestamp",
            format!("punch at {} is in the future (now {})", timestamp, now),
        ));
    }

    if timestamp.date() != now.date() && now - timestamp > skew {
        return Err(EngineError::validation(
            "timestamp",
            format!(
                "punch on {} is not for today {}; past days change only through corrections",
                timestamp.date(),
                now.date()
            ),
        ));
    }

    Ok(())
}

/// Validates a punch against the day's records and builds the record to store.
///
/// `timestamp` and `now` are both business-local. `day_records` may contain
/// records from other days or voided records; only valid punches on the
/// punch's own business-local day are considered.
///
/// # Errors
///
/// - [`EngineError::Validation`] if `punch_type` is ABSENCE_JUSTIFIED, or
///   the timestamp is not for today
/// - [`EngineError::DayComplete`] if all four punches exist
/// - [`EngineError::DuplicatePunch`] if the type already exists that day
/// - [`EngineError::OutOfSequence`] if the predecessor is missing
///
/// # Vouchers
///
/// The day's ENTRY carries the employee's food and transport voucher
/// amounts; every other punch carries zero.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{register_punch, LocationReading};
/// use attendance_engine::error::EngineError;
/// use attendance_engine::models::{Employee, RecordType};
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let employee = Employee::new("emp_001", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
/// let ts = NaiveDateTime::parse_from_str("2026-03-10 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let err = register_punch(&employee, RecordType::LunchStart, ts, ts, &[], LocationReading::Missing)
///     .unwrap_err();
/// assert!(matches!(err, EngineError::OutOfSequence { missing: RecordType::Entry, .. }));
///
/// let tomorrow = ts + chrono::TimeDelta::days(1);
/// let err = register_punch(&employee, RecordType::Entry, tomorrow, ts, &[], LocationReading::Missing)
///     .unwrap_err();
/// assert!(matches!(err, EngineError::Validation { .. }));
/// ```
pub fn register_punch(
    employee: &Employee,
    punch_type: RecordType,
    timestamp: NaiveDateTime,
    now: NaiveDateTime,
    day_records: &[TimeRecord],
    location: LocationReading,
) -> EngineResult<NewTimeRecord> {
    if !punch_type.is_punch() {
        return Err(EngineError::validation(
            "type",
            "ABSENCE_JUSTIFIED cannot be punched; it is recorded from an approved certificate",
        ));
    }

    check_punch_day(timestamp, now)?;

    let today = timestamp.date();
    let registered = registered_on(day_records, today);

    if RecordType::PUNCH_SEQUENCE
        .iter()
        .all(|t| registered.contains(t))
    {
        return Err(EngineError::DayComplete { date: today });
    }

    if registered.contains(&punch_type) {
        return Err(EngineError::DuplicatePunch {
            punch_type,
            date: today,
        });
    }

    if let Some(missing) = punch_type.predecessor()
        && !registered.contains(&missing)
    {
        return Err(EngineError::OutOfSequence {
            punch_type,
            missing,
        });
    }

    let (food_voucher_amount, transport_voucher_amount) = if punch_type == RecordType::Entry {
        (employee.daily_food_voucher, employee.daily_transport_voucher)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Ok(NewTimeRecord {
        employee_id: employee.id.clone(),
        record_type: punch_type,
        timestamp,
        reason: Some(location.reason()),
        observation: None,
        food_voucher_amount,
        transport_voucher_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee() -> Employee {
        Employee {
            daily_food_voucher: dec("30.00"),
            daily_transport_voucher: dec("12.50"),
            ..Employee::new("emp_001", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        }
    }

    fn punch_now(
        punch_type: RecordType,
        timestamp: NaiveDateTime,
        records: &[TimeRecord],
        location: LocationReading,
    ) -> EngineResult<NewTimeRecord> {
        register_punch(&employee(), punch_type, timestamp, timestamp, records, location)
    }

    fn stored(record_type: RecordType, date: &str, time: &str) -> TimeRecord {
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

    fn full_day(date: &str) -> Vec<TimeRecord> {
        vec![
            stored(RecordType::Entry, date, "08:00:00"),
            stored(RecordType::LunchStart, date, "12:00:00"),
            stored(RecordType::LunchEnd, date, "13:00:00"),
            stored(RecordType::Exit, date, "18:00:00"),
        ]
    }

    #[test]
    fn test_entry_carries_vouchers() {
        let record = punch_now(
            RecordType::Entry,
            make_datetime("2026-03-10", "08:00:00"),
            &[],
            LocationReading::Missing,
        )
        .unwrap();

        assert_eq!(record.food_voucher_amount, dec("30.00"));
        assert_eq!(record.transport_voucher_amount, dec("12.50"));
    }

    #[test]
    fn test_other_punches_carry_zero_vouchers() {
        let records = vec![stored(RecordType::Entry, "2026-03-10", "08:00:00")];
        let record = punch_now(
            RecordType::LunchStart,
            make_datetime("2026-03-10", "12:00:00"),
            &records,
            LocationReading::Missing,
        )
        .unwrap();

        assert_eq!(record.food_voucher_amount, Decimal::ZERO);
        assert_eq!(record.transport_voucher_amount, Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let records = vec![stored(RecordType::Entry, "2026-03-10", "08:00:00")];
        let err = punch_now(
            RecordType::Entry,
            make_datetime("2026-03-10", "08:05:00"),
            &records,
            LocationReading::Missing,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::DuplicatePunch {
                punch_type: RecordType::Entry,
                ..
            }
        ));
    }

    #[test]
    fn test_entry_on_previous_day_does_not_count() {
        let records = vec![stored(RecordType::Entry, "2026-03-09", "08:00:00")];
        let result = punch_now(
            RecordType::Entry,
            make_datetime("2026-03-10", "08:00:00"),
            &records,
            LocationReading::Missing,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_each_predecessor_is_required() {
        let cases = [
            (RecordType::LunchStart, RecordType::Entry, vec![]),
            (
                RecordType::LunchEnd,
                RecordType::LunchStart,
                vec![stored(RecordType::Entry, "2026-03-10", "08:00:00")],
            ),
            (
                RecordType::Exit,
                RecordType::LunchEnd,
                vec![
                    stored(RecordType::Entry, "2026-03-10", "08:00:00"),
                    stored(RecordType::LunchStart, "2026-03-10", "12:00:00"),
                ],
            ),
        ];

        for (punch_type, expected_missing, records) in cases {
            let err = punch_now(
                punch_type,
                make_datetime("2026-03-10", "17:00:00"),
                &records,
                LocationReading::Missing,
            )
            .unwrap_err();
            match err {
                EngineError::OutOfSequence { missing, .. } => {
                    assert_eq!(missing, expected_missing)
                }
                other => panic!("unexpected error for {punch_type}: {other}"),
            }
        }
    }

    #[test]
    fn test_complete_day_rejects_any_punch() {
        let records = full_day("2026-03-10");
        for punch_type in RecordType::PUNCH_SEQUENCE {
            let err = punch_now(
                punch_type,
                make_datetime("2026-03-10", "19:00:00"),
                &records,
                LocationReading::Missing,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::DayComplete { .. }));
        }
    }

    #[test]
    fn test_voided_record_does_not_block() {
        let mut entry = stored(RecordType::Entry, "2026-03-10", "08:00:00");
        entry.is_valid = false;
        let result = punch_now(
            RecordType::Entry,
            make_datetime("2026-03-10", "08:10:00"),
            &[entry],
            LocationReading::Missing,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_absence_cannot_be_punched() {
        let err = punch_now(
            RecordType::AbsenceJustified,
            make_datetime("2026-03-10", "08:00:00"),
            &[],
            LocationReading::Missing,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_invalid_location_never_blocks() {
        let reading = LocationReading::from_parts(Some(123.0), Some(500.0));
        assert_eq!(reading, LocationReading::Invalid);

        let record = punch_now(
            RecordType::Entry,
            make_datetime("2026-03-10", "08:00:00"),
            &[],
            reading,
        )
        .unwrap();
        assert_eq!(
            record.reason.as_deref(),
            Some("Ponto registrado com localização inválida")
        );
    }

    #[test]
    fn test_valid_location_in_reason() {
        let reading = LocationReading::from_parts(Some(-23.55052), Some(-46.633308));
        assert_eq!(
            reading.reason(),
            "Ponto registrado com localização (-23.550520, -46.633308)"
        );
    }

    #[test]
    fn test_next_punch_walks_the_sequence() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut records = Vec::new();
        assert_eq!(next_punch(&records, date), Some(RecordType::Entry));
        records.push(stored(RecordType::Entry, "2026-03-10", "08:00:00"));
        assert_eq!(next_punch(&records, date), Some(RecordType::LunchStart));
        assert_eq!(next_punch(&full_day("2026-03-10"), date), None);
    }

    #[test]
    fn test_past_day_punch_rejected() {
        let err = register_punch(
            &employee(),
            RecordType::Entry,
            make_datetime("2026-03-09", "08:00:00"),
            make_datetime("2026-03-10", "08:00:00"),
            &[],
            LocationReading::Missing,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation { ref field, .. } if field == "timestamp"
        ));
    }

    #[test]
    fn test_future_punch_rejected() {
        let now = make_datetime("2026-03-10", "08:00:00");
        for timestamp in [
            make_datetime("2026-03-10", "09:00:00"),
            make_datetime("2026-03-11", "08:00:00"),
            make_datetime("2027-05-03", "08:00:00"),
        ] {
            let err = register_punch(
                &employee(),
                RecordType::Entry,
                timestamp,
                now,
                &[],
                LocationReading::Missing,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::Validation { .. }), "{timestamp}");
        }
    }

    #[test]
    fn test_punch_across_midnight_within_skew() {
        let timestamp = make_datetime("2026-03-09", "23:58:00");
        let record = register_punch(
            &employee(),
            RecordType::Entry,
            timestamp,
            make_datetime("2026-03-10", "00:01:00"),
            &[],
            LocationReading::Missing,
        )
        .unwrap();
        assert_eq!(record.timestamp, timestamp);

        let late = register_punch(
            &employee(),
            RecordType::Entry,
            timestamp,
            make_datetime("2026-03-10", "00:10:00"),
            &[],
            LocationReading::Missing,
        );
        assert!(late.is_err());
    }
}
