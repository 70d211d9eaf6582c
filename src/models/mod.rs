//! Core data models for the Attendance Engine.
//!
//! This module contains the persisted entities read and written through the
//! repository seam, and the derived balances returned to callers.

mod compliance;
mod employee;
mod overtime;
mod time_record;
mod vacation;

pub use compliance::{ComplianceWarning, WarningCode};
pub use employee::Employee;
pub use overtime::{
    NewOvertimeRequest, OvertimeBalance, OvertimeRequest, OvertimeStatus, OvertimeType,
};
pub use time_record::{Location, NewTimeRecord, RecordType, TimeRecord, TimeRecordPatch};
pub use vacation::{VacationBalance, VacationRequest, VacationStatus, VacationType};
