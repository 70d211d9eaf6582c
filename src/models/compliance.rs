//! Compliance warnings.
//!
//! Warnings are surfaced alongside results and never block an operation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of compliance problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Vacation days remain unused past their concessive deadline.
    VacationExpired,
    /// The concessive deadline is close and days remain unused.
    VacationExpiring,
    /// More days were approved than were accrued.
    VacationOverdrawn,
    /// A certificate covers a day that already has a justified absence.
    OverlappingCertificate,
    /// Approved overtime is past its compensation window.
    OvertimeExpired,
}

/// A non-blocking compliance finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    /// What kind of problem this is.
    pub code: WarningCode,
    /// A human-readable description.
    pub message: String,
    /// The date the problem refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ComplianceWarning {
    /// Creates a warning tied to a date.
    pub fn on(code: WarningCode, date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            date: Some(date),
        }
    }
}
