//! Time record model and related types.
//!
//! A time record is one clock punch (or an injected justified absence) as
//! persisted by the storage collaborator.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a time record.
///
/// The four punch types form the daily sequence
/// ENTRY → LUNCH_START → LUNCH_END → EXIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    /// Start of the working day.
    Entry,
    /// Start of the lunch break.
    LunchStart,
    /// End of the lunch break.
    LunchEnd,
    /// End of the working day.
    Exit,
    /// A certificate-backed day off, credited as worked.
    AbsenceJustified,
}

impl RecordType {
    /// The four punch types in their required order.
    pub const PUNCH_SEQUENCE: [RecordType; 4] = [
        RecordType::Entry,
        RecordType::LunchStart,
        RecordType::LunchEnd,
        RecordType::Exit,
    ];

    /// Returns true for the four clock punch types.
    pub fn is_punch(self) -> bool {
        self != RecordType::AbsenceJustified
    }

    /// The punch that must already exist before this one is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::RecordType;
    ///
    /// assert_eq!(RecordType::Entry.predecessor(), None);
    /// assert_eq!(RecordType::Exit.predecessor(), Some(RecordType::LunchEnd));
    /// ```
    pub fn predecessor(self) -> Option<RecordType> {
        match self {
            RecordType::LunchStart => Some(RecordType::Entry),
            RecordType::LunchEnd => Some(RecordType::LunchStart),
            RecordType::Exit => Some(RecordType::LunchEnd),
            RecordType::Entry | RecordType::AbsenceJustified => None,
        }
    }

    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Entry => "ENTRY",
            RecordType::LunchStart => "LUNCH_START",
            RecordType::LunchEnd => "LUNCH_END",
            RecordType::Exit => "EXIT",
            RecordType::AbsenceJustified => "ABSENCE_JUSTIFIED",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted time record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee who punched.
    pub employee_id: String,
    /// The kind of record.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Business-local wall-clock time of the punch.
    pub timestamp: NaiveDateTime,
    /// False once an administrator has voided the record.
    pub is_valid: bool,
    /// Human-readable reason, e.g. the geolocation note.
    #[serde(default)]
    pub reason: Option<String>,
    /// Free-text observation added by the employee or an administrator.
    #[serde(default)]
    pub observation: Option<String>,
    /// Food voucher stamped on the day's ENTRY.
    #[serde(default)]
    pub food_voucher_amount: Decimal,
    /// Transport voucher stamped on the day's ENTRY.
    #[serde(default)]
    pub transport_voucher_amount: Decimal,
}

impl TimeRecord {
    /// The business-local calendar day of the record.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Returns true if the record is valid and of type `record_type`.
    pub fn is_active(&self, record_type: RecordType) -> bool {
        self.is_valid && self.record_type == record_type
    }
}

/// A record accepted by the sequencer and not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeRecord {
    /// The employee who punched.
    pub employee_id: String,
    /// The kind of record.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Business-local wall-clock time of the punch.
    pub timestamp: NaiveDateTime,
    /// Human-readable reason.
    pub reason: Option<String>,
    /// Free-text observation.
    pub observation: Option<String>,
    /// Food voucher amount.
    pub food_voucher_amount: Decimal,
    /// Transport voucher amount.
    pub transport_voucher_amount: Decimal,
}

impl NewTimeRecord {
    /// Assigns an id, producing the stored form.
    pub fn into_record(self, id: Uuid) -> TimeRecord {
        TimeRecord {
            id,
            employee_id: self.employee_id,
            record_type: self.record_type,
            timestamp: self.timestamp,
            is_valid: true,
            reason: self.reason,
            observation: self.observation,
            food_voucher_amount: self.food_voucher_amount,
            transport_voucher_amount: self.transport_voucher_amount,
        }
    }
}

/// An administrative correction. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordPatch {
    /// New record type.
    #[serde(default, rename = "type")]
    pub record_type: Option<RecordType>,
    /// New timestamp.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    /// New reason text.
    #[serde(default)]
    pub reason: Option<String>,
    /// New observation text.
    #[serde(default)]
    pub observation: Option<String>,
    /// Voids (`false`) or restores (`true`) the record.
    #[serde(default)]
    pub is_valid: Option<bool>,
}

impl TimeRecordPatch {
    /// Returns the record as it will look after the patch.
    pub fn apply_to(&self, record: &TimeRecord) -> TimeRecord {
        let mut patched = record.clone();
        if let Some(record_type) = self.record_type {
            patched.record_type = record_type;
        }
        if let Some(timestamp) = self.timestamp {
            patched.timestamp = timestamp;
        }
        if let Some(reason) = &self.reason {
            patched.reason = Some(reason.clone());
        }
        if let Some(observation) = &self.observation {
            patched.observation = Some(observation.clone());
        }
        if let Some(is_valid) = self.is_valid {
            patched.is_valid = is_valid;
        }
        patched
    }
}

/// Coordinates attached to a punch. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Returns true if both coordinates are finite and in range.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Location;
    ///
    /// assert!(Location { latitude: -23.55, longitude: -46.63 }.is_valid());
    /// assert!(!Location { latitude: 91.0, longitude: 0.0 }.is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_record(record_type: RecordType) -> TimeRecord {
        NewTimeRecord {
            employee_id: "emp_001".to_string(),
            record_type,
            timestamp: make_datetime("2026-03-10 08:00:00"),
            reason: None,
            observation: None,
            food_voucher_amount: Decimal::ZERO,
            transport_voucher_amount: Decimal::ZERO,
        }
        .into_record(Uuid::new_v4())
    }

    #[test]
    fn test_record_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&RecordType::LunchStart).unwrap(),
            "\"LUNCH_START\""
        );
        assert_eq!(
            serde_json::to_string(&RecordType::AbsenceJustified).unwrap(),
            "\"ABSENCE_JUSTIFIED\""
        );
        let parsed: RecordType = serde_json::from_str("\"EXIT\"").unwrap();
        assert_eq!(parsed, RecordType::Exit);
    }

    #[test]
    fn test_predecessor_chain() {
        assert_eq!(RecordType::LunchStart.predecessor(), Some(RecordType::Entry));
        assert_eq!(
            RecordType::LunchEnd.predecessor(),
            Some(RecordType::LunchStart)
        );
        assert_eq!(RecordType::AbsenceJustified.predecessor(), None);
        assert!(!RecordType::AbsenceJustified.is_punch());
    }

    #[test]
    fn test_new_record_is_valid_when_stored() {
        let record = make_record(RecordType::Entry);
        assert!(record.is_valid);
        assert!(record.is_active(RecordType::Entry));
        assert!(!record.is_active(RecordType::Exit));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let record = make_record(RecordType::Entry);
        let patch = TimeRecordPatch {
            timestamp: Some(make_datetime("2026-03-10 07:45:00")),
            observation: Some("Esqueceu de bater o ponto".to_string()),
            ..Default::default()
        };

        let patched = patch.apply_to(&record);
        assert_eq!(patched.record_type, RecordType::Entry);
        assert_eq!(patched.timestamp, make_datetime("2026-03-10 07:45:00"));
        assert_eq!(
            patched.observation.as_deref(),
            Some("Esqueceu de bater o ponto")
        );
        assert!(patched.is_valid);
        assert_eq!(patched.id, record.id);
    }

    #[test]
    fn test_location_rejects_non_finite() {
        assert!(!Location {
            latitude: f64::NAN,
            longitude: 0.0
        }
        .is_valid());
        assert!(!Location {
            latitude: 0.0,
            longitude: 180.5
        }
        .is_valid());
    }
}
