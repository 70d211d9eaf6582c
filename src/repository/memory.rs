//! In-memory store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use super::{
    BatchInsert, EmployeeRepository, OvertimeQuery, OvertimeRepository, TimeRecordQuery,
    TimeRecordRepository, VacationQuery, VacationRepository,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, NewOvertimeRequest, NewTimeRecord, OvertimeRequest, OvertimeStatus, RecordType,
    TimeRecord, TimeRecordPatch, VacationRequest,
};

fn poisoned<T>(err: PoisonError<T>) -> EngineError {
    EngineError::persistence("store lock poisoned", err.to_string())
}

/// A thread-safe store holding everything in memory.
///
/// Time records live behind a single lock, so the duplicate-punch check and
/// the write happen atomically, and a batch lands in one critical section.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Employee;
/// use attendance_engine::repository::{EmployeeRepository, InMemoryStore};
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new();
/// store.add_employee(Employee::new("emp_001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// assert!(store.find_employee("emp_001").unwrap().is_some());
/// assert!(store.find_employee("emp_404").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    time_records: RwLock<Vec<TimeRecord>>,
    vacation_requests: RwLock<Vec<VacationRequest>>,
    overtime_requests: RwLock<Vec<OvertimeRequest>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces an employee.
    pub fn add_employee(&self, employee: Employee) {
        let mut employees = self.employees.write().unwrap_or_else(PoisonError::into_inner);
        employees.insert(employee.id.clone(), employee);
    }

    /// Stores a vacation request as-is.
    pub fn add_vacation_request(&self, request: VacationRequest) {
        self.vacation_requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    /// Stores an overtime request as-is, whatever its status.
    pub fn add_overtime_request(&self, request: OvertimeRequest) {
        self.overtime_requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    /// Moves an overtime request to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when no request has that id.
    pub fn set_overtime_status(&self, request_id: Uuid, status: OvertimeStatus) -> EngineResult<()> {
        let mut requests = self.overtime_requests.write().map_err(poisoned)?;
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| {
                EngineError::validation("id", format!("no overtime request {}", request_id))
            })?;
        request.status = status;
        Ok(())
    }

    /// Number of stored time records, voided ones included.
    pub fn time_record_count(&self) -> usize {
        self.time_records
            .read()
            .map(|records| records.len())
            .unwrap_or_default()
    }
}

/// Returns the valid record of `candidate`'s employee, type and day, if any.
fn find_covering<'a>(
    records: &'a [TimeRecord],
    candidate: &TimeRecord,
) -> Option<&'a TimeRecord> {
    let date = candidate.date();
    records.iter().find(|r| {
        r.employee_id == candidate.employee_id
            && r.is_active(candidate.record_type)
            && r.date() == date
    })
}

/// Returns the conflicting punch type and day if `candidate` would be a
/// second valid punch of its type on its day.
fn find_conflict(
    records: &[TimeRecord],
    candidate: &TimeRecord,
) -> Option<(RecordType, NaiveDate)> {
    if !candidate.is_valid || !candidate.record_type.is_punch() {
        return None;
    }
    let date = candidate.date();
    records
        .iter()
        .any(|r| {
            r.id != candidate.id
                && r.employee_id == candidate.employee_id
                && r.is_active(candidate.record_type)
                && r.date() == date
        })
        .then_some((candidate.record_type, date))
}

impl EmployeeRepository for InMemoryStore {
    fn find_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.get(employee_id).cloned())
    }
}

impl TimeRecordRepository for InMemoryStore {
    fn find_time_records(&self, query: &TimeRecordQuery) -> EngineResult<Vec<TimeRecord>> {
        let records = self.time_records.read().map_err(poisoned)?;
        let mut found: Vec<TimeRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.timestamp);
        Ok(found)
    }

    fn find_time_record(&self, record_id: Uuid) -> EngineResult<Option<TimeRecord>> {
        let records = self.time_records.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| r.id == record_id).cloned())
    }

    fn create_time_record(&self, record: NewTimeRecord) -> EngineResult<TimeRecord> {
        let mut records = self.time_records.write().map_err(poisoned)?;
        let record = record.into_record(Uuid::new_v4());

        if let Some((punch_type, date)) = find_conflict(&records, &record) {
            debug!(employee_id = %record.employee_id, %punch_type, %date, "unique punch constraint hit");
            return Err(EngineError::DuplicatePunch { punch_type, date });
        }

        records.push(record.clone());
        Ok(record)
    }

    fn create_missing_time_records(
        &self,
        batch: Vec<NewTimeRecord>,
    ) -> EngineResult<BatchInsert> {
        let mut records = self.time_records.write().map_err(poisoned)?;
        let mut outcome = BatchInsert::default();

        for new_record in batch {
            let record = new_record.into_record(Uuid::new_v4());
            let covering = find_covering(&records, &record)
                .or_else(|| find_covering(&outcome.created, &record));
            match covering {
                Some(existing) => outcome.existing.push(existing.clone()),
                None => outcome.created.push(record),
            }
        }

        debug!(
            created = outcome.created.len(),
            existing = outcome.existing.len(),
            "batch insert"
        );
        records.extend(outcome.created.iter().cloned());
        Ok(outcome)
    }

    fn update_time_record(
        &self,
        record_id: Uuid,
        patch: &TimeRecordPatch,
    ) -> EngineResult<TimeRecord> {
        let mut records = self.time_records.write().map_err(poisoned)?;
        let index = records
            .iter()
            .position(|r| r.id == record_id)
            .ok_or(EngineError::RecordNotFound { record_id })?;

        let patched = patch.apply_to(&records[index]);
        if let Some((punch_type, date)) = find_conflict(&records, &patched) {
            return Err(EngineError::DuplicatePunch { punch_type, date });
        }

        records[index] = patched.clone();
        Ok(patched)
    }
}

impl VacationRepository for InMemoryStore {
    fn find_vacation_requests(&self, query: &VacationQuery) -> EngineResult<Vec<VacationRequest>> {
        let requests = self.vacation_requests.read().map_err(poisoned)?;
        let mut found: Vec<VacationRequest> = requests
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start_date);
        Ok(found)
    }
}

impl OvertimeRepository for InMemoryStore {
    fn find_overtime_requests(&self, query: &OvertimeQuery) -> EngineResult<Vec<OvertimeRequest>> {
        let requests = self.overtime_requests.read().map_err(poisoned)?;
        let mut found: Vec<OvertimeRequest> = requests
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        Ok(found)
    }

    fn create_overtime_request(
        &self,
        request: NewOvertimeRequest,
    ) -> EngineResult<OvertimeRequest> {
        let mut requests = self.overtime_requests.write().map_err(poisoned)?;
        let request = request.into_request(Uuid::new_v4());
        requests.push(request.clone());
        Ok(request)
    }
}
