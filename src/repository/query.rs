//! Typed query values.
//!
//! Each entity has its own filter type; storage backends translate them
//! into whatever their query language needs. `matches` gives the reference
//! semantics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{OvertimeRequest, OvertimeStatus, RecordType, TimeRecord, VacationRequest, VacationStatus};

/// Filter for time records of one employee.
///
/// # Example
///
/// ```
/// use attendance_engine::models::RecordType;
/// use attendance_engine::repository::TimeRecordQuery;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let query = TimeRecordQuery::for_employee("emp_001").on(day).of_type(RecordType::Entry);
/// assert_eq!(query.from, Some(day));
/// assert_eq!(query.to, Some(day));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecordQuery {
    /// The employee whose records are wanted.
    pub employee_id: String,
    /// First business-local day (inclusive).
    pub from: Option<NaiveDate>,
    /// Last business-local day (inclusive).
    pub to: Option<NaiveDate>,
    /// Restrict to one record type.
    pub record_type: Option<RecordType>,
    /// Also return records voided by an administrator.
    pub include_voided: bool,
}

impl TimeRecordQuery {
    /// All valid records of an employee.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            from: None,
            to: None,
            record_type: None,
            include_voided: false,
        }
    }

    /// Restricts to a single day.
    pub fn on(self, date: NaiveDate) -> Self {
        self.between(date, date)
    }

    /// Restricts to an inclusive range of days.
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Restricts to one record type.
    pub fn of_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    /// Includes voided records.
    pub fn including_voided(mut self) -> Self {
        self.include_voided = true;
        self
    }

    /// Returns true if `record` satisfies the filter.
    pub fn matches(&self, record: &TimeRecord) -> bool {
        let date = record.date();
        record.employee_id == self.employee_id
            && (self.include_voided || record.is_valid)
            && self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
            && self.record_type.is_none_or(|t| record.record_type == t)
    }
}

/// Filter for vacation requests of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationQuery {
    /// The requesting employee.
    pub employee_id: String,
    /// Restrict to one status.
    pub status: Option<VacationStatus>,
}

impl VacationQuery {
    /// All vacation requests of an employee.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            status: None,
        }
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status: VacationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if `request` satisfies the filter.
    pub fn matches(&self, request: &VacationRequest) -> bool {
        request.employee_id == self.employee_id
            && self.status.is_none_or(|s| request.status == s)
    }
}

/// Filter for overtime requests of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeQuery {
    /// The employee who filed.
    pub employee_id: String,
    /// Restrict to one status.
    pub status: Option<OvertimeStatus>,
    /// Only requests for days on or after this date.
    pub since: Option<NaiveDate>,
}

impl OvertimeQuery {
    /// All overtime requests of an employee.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            status: None,
            since: None,
        }
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status: OvertimeStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to requests on or after `date`.
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Returns true if `request` satisfies the filter.
    pub fn matches(&self, request: &OvertimeRequest) -> bool {
        request.employee_id == self.employee_id
            && self.status.is_none_or(|s| request.status == s)
            && self.since.is_none_or(|since| request.date >= since)
    }
}
