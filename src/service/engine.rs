//! The attendance service.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::summary::{DailySummary, summarize_day};
use crate::calculation::{
    BankHoursResult, LocationReading, calculate_bank_hours, calculate_overtime_balance,
    calculate_vacation_balance, can_compensate, effective_range, expected_hours, register_punch,
    validate_overtime_request, validate_vacation_request,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComplianceWarning, Employee, NewOvertimeRequest, NewTimeRecord, OvertimeBalance,
    OvertimeRequest, RecordType, TimeRecord, TimeRecordPatch, VacationBalance, WarningCode,
};
use crate::repository::{OvertimeQuery, Store, TimeRecordQuery, VacationQuery};

/// Outcome of recording a certificate-backed absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceInjection {
    /// One ABSENCE_JUSTIFIED record per covered working day.
    pub records: Vec<TimeRecord>,
    /// Days that were already covered by another certificate.
    pub warnings: Vec<ComplianceWarning>,
}

/// Entry point for every attendance operation.
///
/// Each call fetches one snapshot from the store, runs the pure calculators
/// over it, and writes back at most what the operation creates. "Today" is
/// always the business-local day of the clock's instant.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::models::{Employee, RecordType};
/// use attendance_engine::repository::InMemoryStore;
/// use attendance_engine::service::{AttendanceService, FixedClock};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let store = Arc::new(InMemoryStore::new());
/// store.add_employee(Employee::new("emp_001", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap();
/// let service = AttendanceService::with_clock(store, EngineConfig::default(), FixedClock::new(now));
///
/// let record = service.punch("emp_001", RecordType::Entry, now, None, None).unwrap();
/// assert_eq!(record.timestamp.to_string(), "2026-03-10 08:00:00");
/// ```
#[derive(Debug)]
pub struct AttendanceService<S, C = SystemClock> {
    store: Arc<S>,
    config: EngineConfig,
    clock: C,
}

impl<S: Store> AttendanceService<S, SystemClock> {
    /// Creates a service on the system clock.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: Store, C: Clock> AttendanceService<S, C> {
    /// Creates a service on an explicit clock.
    pub fn with_clock(store: Arc<S>, config: EngineConfig, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The clock this service reads "now" from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The business-local current day.
    pub fn today(&self) -> NaiveDate {
        self.config.timezone.today(self.clock.now())
    }

    fn employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.store.find_employee(employee_id)?.ok_or_else(|| {
            warn!(employee_id = %employee_id, "Employee not found");
            EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            }
        })
    }

    /// Registers a clock punch.
    ///
    /// The instant is converted to business-local time; the punch belongs to
    /// that local day, which must be today by the service clock. Earlier days
    /// only change through [`AttendanceService::correct_record`]. Coordinates
    /// are advisory and only shape the reason text.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmployeeNotFound`] for an unknown employee
    /// - [`EngineError::Validation`] for a punch before the hire date, a punch
    ///   on a day other than today, or an ABSENCE_JUSTIFIED punch
    /// - [`EngineError::DayComplete`], [`EngineError::DuplicatePunch`] or
    ///   [`EngineError::OutOfSequence`] when the day's sequence rejects it
    pub fn punch(
        &self,
        employee_id: &str,
        punch_type: RecordType,
        timestamp: DateTime<Utc>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> EngineResult<TimeRecord> {
        let employee = self.employee(employee_id)?;
        let local = self.config.timezone.to_local(timestamp);
        let date = local.date();

        if !employee.was_employed_on(date) {
            return Err(EngineError::validation(
                "timestamp",
                format!("{} is before the hire date {}", date, employee.hire_date),
            ));
        }

        let location = LocationReading::from_parts(latitude, longitude);
        if location == LocationReading::Invalid {
            debug!(employee_id = %employee_id, ?latitude, ?longitude, "Punch with unusable coordinates");
        }

        let day_records = self
            .store
            .find_time_records(&TimeRecordQuery::for_employee(employee_id).on(date))?;

        let now = self.config.timezone.to_local(self.clock.now());
        let record = register_punch(&employee, punch_type, local, now, &day_records, location)
            .and_then(|new_record| self.store.create_time_record(new_record))
            .inspect_err(|err| {
                warn!(
                    employee_id = %employee_id,
                    punch_type = %punch_type,
                    %date,
                    error = %err,
                    "Punch rejected"
                );
            })?;

        info!(
            employee_id = %employee_id,
            record_id = %record.id,
            punch_type = %punch_type,
            timestamp = %record.timestamp,
            "Punch registered"
        );
        Ok(record)
    }

    /// Computes the bank of hours over `[start, end]`, clipped to the
    /// employment period and today.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `start` is after `end`, or
    /// [`EngineError::EmployeeNotFound`] for an unknown employee.
    pub fn bank_hours(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        detailed: bool,
    ) -> EngineResult<BankHoursResult> {
        let employee = self.employee(employee_id)?;
        let today = self.today();
        let start_time = Instant::now();

        let records = match effective_range(employee.hire_date, start, end, today) {
            Some((from, to)) if start <= end => self
                .store
                .find_time_records(&TimeRecordQuery::for_employee(employee_id).between(from, to))?,
            _ => Vec::new(),
        };

        let result =
            calculate_bank_hours(&records, employee.hire_date, start, end, today, detailed)?;

        info!(
            employee_id = %employee_id,
            %start,
            %end,
            days_counted = result.days_counted,
            balance_hours = %result.balance_hours,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Bank of hours calculated"
        );
        Ok(result)
    }

    /// The vacation balance as of today.
    pub fn vacation_balance(&self, employee_id: &str) -> EngineResult<VacationBalance> {
        self.vacation_balance_as_of(employee_id, self.today())
    }

    /// The vacation balance as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmployeeNotFound`] for an unknown employee.
    pub fn vacation_balance_as_of(
        &self,
        employee_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<VacationBalance> {
        let employee = self.employee(employee_id)?;
        let requests = self
            .store
            .find_vacation_requests(&VacationQuery::for_employee(employee_id))?;

        let balance = calculate_vacation_balance(
            employee.hire_date,
            as_of,
            &requests,
            self.config.settings.vacation_days_per_year,
        );

        for warning in &balance.warnings {
            warn!(employee_id = %employee_id, code = ?warning.code, "{}", warning.message);
        }
        info!(
            employee_id = %employee_id,
            %as_of,
            available_days = balance.available_days,
            "Vacation balance calculated"
        );
        Ok(balance)
    }

    /// Checks a prospective vacation range against today's balance and
    /// returns the number of vacation days it would consume.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the range is empty, inverted,
    /// or larger than what can still be requested.
    pub fn check_vacation_request(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<i64> {
        let balance = self.vacation_balance(employee_id)?;
        validate_vacation_request(&balance, start, end)
    }

    /// Summarizes one day: records, hours, next punch and punctuality.
    pub fn daily_summary(&self, employee_id: &str, date: NaiveDate) -> EngineResult<DailySummary> {
        self.employee(employee_id)?;
        let records = self
            .store
            .find_time_records(&TimeRecordQuery::for_employee(employee_id).on(date))?;
        Ok(summarize_day(
            employee_id,
            date,
            records,
            &self.config.settings,
        ))
    }

    /// Applies an administrative correction to a record.
    ///
    /// # Errors
    ///
    /// - [`EngineError::RecordNotFound`] for an unknown record
    /// - [`EngineError::DuplicatePunch`] if the patched record would be a
    ///   second valid punch of its type on its day
    pub fn correct_record(
        &self,
        record_id: Uuid,
        patch: &TimeRecordPatch,
    ) -> EngineResult<TimeRecord> {
        let before = self
            .store
            .find_time_record(record_id)?
            .ok_or(EngineError::RecordNotFound { record_id })?;

        let after = self
            .store
            .update_time_record(record_id, patch)
            .inspect_err(|err| {
                warn!(record_id = %record_id, error = %err, "Correction rejected");
            })?;

        info!(
            record_id = %record_id,
            employee_id = %after.employee_id,
            from_type = %before.record_type,
            to_type = %after.record_type,
            from_timestamp = %before.timestamp,
            to_timestamp = %after.timestamp,
            is_valid = after.is_valid,
            "Record corrected"
        );
        Ok(after)
    }

    /// Records a certificate-backed absence over `[start, end]`.
    ///
    /// One ABSENCE_JUSTIFIED record is created per day that expects work,
    /// stamped at the company start time. Days before the hire date are
    /// skipped. A day that already holds a justified absence keeps its
    /// existing record, which is returned alongside an
    /// `OVERLAPPING_CERTIFICATE` warning. The whole range is written in one
    /// store batch, so a failure leaves no day recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `start` is after `end`.
    pub fn record_justified_absence(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
    ) -> EngineResult<AbsenceInjection> {
        if start > end {
            return Err(EngineError::validation(
                "end_date",
                format!("end date {} is before start date {}", end, start),
            ));
        }
        let employee = self.employee(employee_id)?;

        let absences: Vec<NewTimeRecord> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| employee.was_employed_on(*date) && expected_hours(*date) > Decimal::ZERO)
            .map(|date| NewTimeRecord {
                employee_id: employee_id.to_string(),
                record_type: RecordType::AbsenceJustified,
                timestamp: date.and_time(self.config.settings.work_start_time),
                reason: Some(reason.to_string()),
                observation: None,
                food_voucher_amount: Decimal::ZERO,
                transport_voucher_amount: Decimal::ZERO,
            })
            .collect();

        let outcome = self
            .store
            .create_missing_time_records(absences)
            .inspect_err(|err| {
                warn!(employee_id = %employee_id, error = %err, "Justified absence not recorded");
            })?;

        let warnings = outcome
            .existing
            .iter()
            .map(|record| {
                ComplianceWarning::on(
                    WarningCode::OverlappingCertificate,
                    record.date(),
                    format!("{} already has a justified absence", record.date()),
                )
            })
            .collect();
        let mut records = outcome.created;
        records.extend(outcome.existing);
        records.sort_by_key(|r| r.timestamp);

        let injection = AbsenceInjection { records, warnings };

        if !injection.warnings.is_empty() {
            warn!(
                employee_id = %employee_id,
                overlapping_days = injection.warnings.len(),
                "Certificate overlaps existing absences"
            );
        }
        info!(
            employee_id = %employee_id,
            %start,
            %end,
            days = injection.records.len(),
            "Justified absence recorded"
        );
        Ok(injection)
    }

    /// The filed-overtime balance as of today.
    pub fn overtime_balance(&self, employee_id: &str) -> EngineResult<OvertimeBalance> {
        self.employee(employee_id)?;
        let requests = self
            .store
            .find_overtime_requests(&OvertimeQuery::for_employee(employee_id))?;
        let balance = calculate_overtime_balance(&requests, self.today());

        for warning in &balance.warnings {
            warn!(employee_id = %employee_id, code = ?warning.code, "{}", warning.message);
        }
        Ok(balance)
    }

    /// Files a new overtime request in the pending state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the hours are not positive,
    /// exceed the configured daily maximum, or the date is in the future or
    /// before the hire date.
    pub fn file_overtime_request(
        &self,
        request: NewOvertimeRequest,
    ) -> EngineResult<OvertimeRequest> {
        let employee = self.employee(&request.employee_id)?;
        validate_overtime_request(&request, self.config.settings.max_overtime_hours, self.today())?;
        if !employee.was_employed_on(request.date) {
            return Err(EngineError::validation(
                "date",
                format!("{} is before the hire date {}", request.date, employee.hire_date),
            ));
        }

        let filed = self.store.create_overtime_request(request)?;
        info!(
            employee_id = %filed.employee_id,
            request_id = %filed.id,
            date = %filed.date,
            hours = %filed.hours,
            "Overtime request filed"
        );
        Ok(filed)
    }

    /// Returns true if `hours` of time off can be compensated today.
    pub fn can_compensate(&self, employee_id: &str, hours: Decimal) -> EngineResult<bool> {
        self.employee(employee_id)?;
        let requests = self
            .store
            .find_overtime_requests(&OvertimeQuery::for_employee(employee_id))?;
        Ok(can_compensate(&requests, hours, self.today()))
    }
}
