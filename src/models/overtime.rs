//! Formally filed overtime requests.
//!
//! This ledger is independent of the bank of hours: requests are filed and
//! approved by people, not derived from punches.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ComplianceWarning;

/// Why the overtime was worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OvertimeType {
    /// Weekday overtime.
    Regular,
    /// Weekend overtime.
    Weekend,
    /// Holiday overtime.
    Holiday,
    /// Night overtime.
    Night,
}

/// Lifecycle state of an overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OvertimeStatus {
    /// Awaiting approval.
    Pending,
    /// Approved; the hours can be compensated.
    Approved,
    /// Rejected by a manager.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A filed overtime request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The employee who worked the overtime.
    pub employee_id: String,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Hours claimed.
    pub hours: Decimal,
    /// The kind of overtime.
    #[serde(rename = "type")]
    pub overtime_type: OvertimeType,
    /// Current status.
    pub status: OvertimeStatus,
    /// Why the overtime was needed.
    #[serde(default)]
    pub reason: Option<String>,
}

/// An overtime request as filed, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOvertimeRequest {
    /// The employee who worked the overtime.
    pub employee_id: String,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Hours claimed.
    pub hours: Decimal,
    /// The kind of overtime.
    #[serde(rename = "type")]
    pub overtime_type: OvertimeType,
    /// Why the overtime was needed.
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewOvertimeRequest {
    /// Assigns an id; new requests always start out pending.
    pub fn into_request(self, id: Uuid) -> OvertimeRequest {
        OvertimeRequest {
            id,
            employee_id: self.employee_id,
            date: self.date,
            hours: self.hours,
            overtime_type: self.overtime_type,
            status: OvertimeStatus::Pending,
            reason: self.reason,
        }
    }
}

/// Snapshot of an employee's filed-overtime ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeBalance {
    /// The date the balance was computed for.
    pub as_of: NaiveDate,
    /// Sum of approved hours.
    pub approved_hours: Decimal,
    /// Sum of pending hours.
    pub pending_hours: Decimal,
    /// Approved minus pending.
    pub available_hours: Decimal,
    /// Approved hours still inside the compensation window.
    pub eligible_hours: Decimal,
    /// Approved hours whose compensation window has closed.
    pub expired_hours: Decimal,
    /// Six months after the oldest still-eligible approved request.
    pub compensation_deadline: Option<NaiveDate>,
    /// Compliance problems found while computing the balance.
    #[serde(default)]
    pub warnings: Vec<ComplianceWarning>,
}
