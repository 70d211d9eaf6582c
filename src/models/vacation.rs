//! Vacation request and balance models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ComplianceWarning;

/// Lifecycle state of a vacation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VacationStatus {
    /// Awaiting approval.
    Pending,
    /// Approved; the days are consumed.
    Approved,
    /// Rejected by a manager.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// The kind of leave requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VacationType {
    /// Annual vacation drawn from the CLT entitlement.
    Annual,
    /// Unpaid leave, outside the entitlement.
    Unpaid,
    /// Special leave (wedding, bereavement, ...), outside the entitlement.
    Special,
}

/// A recorded vacation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Number of vacation days, counted Monday to Friday.
    pub days: i64,
    /// The kind of leave.
    #[serde(rename = "type")]
    pub vacation_type: VacationType,
    /// Current status.
    pub status: VacationStatus,
}

impl VacationRequest {
    /// Returns true if the request draws on the annual entitlement with `status`.
    pub fn is_annual_with(&self, status: VacationStatus) -> bool {
        self.vacation_type == VacationType::Annual && self.status == status
    }
}

/// An employee's vacation position on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationBalance {
    /// The date the balance was computed for.
    pub as_of: NaiveDate,
    /// Complete acquisitive periods since hire.
    pub years_worked: u32,
    /// Days accrued, capped at two annual entitlements.
    pub total_days: i64,
    /// Days consumed by approved annual requests.
    pub used_days: i64,
    /// Days still available to request.
    pub available_days: i64,
    /// Days held by pending annual requests.
    pub pending_days: i64,
    /// The date the next acquisitive period completes.
    pub next_vacation_date: NaiveDate,
    /// Concessive deadline for the oldest unused entitlement.
    pub expires_at: NaiveDate,
    /// Compliance problems found while computing the balance.
    #[serde(default)]
    pub warnings: Vec<ComplianceWarning>,
}
