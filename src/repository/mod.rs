//! Storage and HR collaborator seams.
//!
//! The engine never talks to a database directly. It reads and writes
//! through these traits, which a deployment implements over its own
//! storage. [`InMemoryStore`] is the reference implementation used by the
//! tests and benchmarks.
//!
//! Implementations of [`TimeRecordRepository::create_time_record`] and
//! [`TimeRecordRepository::update_time_record`] must enforce, atomically,
//! that at most one valid punch of each type exists per employee and day,
//! answering [`EngineError::DuplicatePunch`](crate::error::EngineError::DuplicatePunch)
//! otherwise. The sequencer's own check is advisory under concurrency.
//! [`TimeRecordRepository::create_missing_time_records`] must likewise run
//! its existence check and its inserts as one unit.

mod memory;
mod query;

pub use memory::InMemoryStore;
pub use query::{OvertimeQuery, TimeRecordQuery, VacationQuery};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Employee, NewOvertimeRequest, NewTimeRecord, OvertimeRequest, TimeRecord, TimeRecordPatch,
    VacationRequest,
};

/// Outcome of [`TimeRecordRepository::create_missing_time_records`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInsert {
    /// Records stored by this call.
    pub created: Vec<TimeRecord>,
    /// Valid records that already covered a requested type and day.
    pub existing: Vec<TimeRecord>,
}

/// Read access to the HR system.
pub trait EmployeeRepository {
    /// Looks an employee up by id.
    fn find_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>>;
}

/// Persistence of time records.
pub trait TimeRecordRepository {
    /// Returns matching records ordered by timestamp.
    fn find_time_records(&self, query: &TimeRecordQuery) -> EngineResult<Vec<TimeRecord>>;

    /// Looks a single record up by id, voided or not.
    fn find_time_record(&self, record_id: Uuid) -> EngineResult<Option<TimeRecord>>;

    /// Stores a new, valid record and returns it with its id.
    fn create_time_record(&self, record: NewTimeRecord) -> EngineResult<TimeRecord>;

    /// Stores every record whose employee, type and day hold no valid
    /// record yet, and reports the ones that do.
    ///
    /// The batch is all-or-nothing: on error nothing is stored, and no
    /// concurrent writer can slip a record in between the check and the
    /// inserts.
    fn create_missing_time_records(
        &self,
        records: Vec<NewTimeRecord>,
    ) -> EngineResult<BatchInsert>;

    /// Applies an administrative correction and returns the updated record.
    fn update_time_record(
        &self,
        record_id: Uuid,
        patch: &TimeRecordPatch,
    ) -> EngineResult<TimeRecord>;
}

/// Read access to vacation requests.
pub trait VacationRepository {
    /// Returns matching requests ordered by start date.
    fn find_vacation_requests(&self, query: &VacationQuery) -> EngineResult<Vec<VacationRequest>>;
}

/// Persistence of overtime requests.
pub trait OvertimeRepository {
    /// Returns matching requests ordered by date.
    fn find_overtime_requests(&self, query: &OvertimeQuery) -> EngineResult<Vec<OvertimeRequest>>;

    /// Files a new request in the pending state.
    fn create_overtime_request(&self, request: NewOvertimeRequest)
    -> EngineResult<OvertimeRequest>;
}

/// Everything the attendance service needs from storage.
pub trait Store:
    EmployeeRepository + TimeRecordRepository + VacationRepository + OvertimeRepository
{
}

impl<T> Store for T where
    T: EmployeeRepository + TimeRecordRepository + VacationRepository + OvertimeRepository
{
}
