//! Error types for the Attendance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while registering punches,
//! correcting records, and reading balances.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::RecordType;

/// The main error type for the Attendance Engine.
///
/// Calculators never fail on well-formed input; errors come from invalid
/// requests, punch sequence violations, unknown identifiers, configuration,
/// or the persistence layer.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A request field was malformed. Nothing was changed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A punch of this type already exists for the day.
    #[error("Duplicate punch: {punch_type} already registered on {date}")]
    DuplicatePunch {
        /// The punch type that was repeated.
        punch_type: RecordType,
        /// The business-local day of the punch.
        date: NaiveDate,
    },

    /// A punch arrived before its required predecessor.
    #[error("Out of sequence: {punch_type} requires a prior {missing}")]
    OutOfSequence {
        /// The punch type that was attempted.
        punch_type: RecordType,
        /// The predecessor that has not been registered yet.
        missing: RecordType,
    },

    /// All four punches already exist for the day.
    #[error("All punches already registered on {date}")]
    DayComplete {
        /// The completed day.
        date: NaiveDate,
    },

    /// The employee is unknown to the HR collaborator.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The unknown employee ID.
        employee_id: String,
    },

    /// The time record is unknown.
    #[error("Time record not found: {record_id}")]
    RecordNotFound {
        /// The unknown record ID.
        record_id: Uuid,
    },

    /// The persistence collaborator failed.
    #[error("Persistence error: {message}")]
    Persistence {
        /// What the engine asked of the collaborator.
        message: String,
        /// The collaborator's own error, kept for `source()` chains.
        #[source]
        source: BoxedError,
    },
}

/// A collaborator error carried inside [`EngineError::Persistence`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Broad classes of [`EngineError`], used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any state change.
    Validation,
    /// Punch out of order, duplicated, or past a completed day.
    SequenceViolation,
    /// Unknown employee or record.
    NotFound,
    /// Unreadable or missing configuration.
    Configuration,
    /// The storage layer failed.
    Persistence,
}

impl EngineError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::DuplicatePunch { .. }
            | EngineError::OutOfSequence { .. }
            | EngineError::DayComplete { .. } => ErrorKind::SequenceViolation,
            EngineError::EmployeeNotFound { .. } | EngineError::RecordNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Wraps a storage failure, keeping the original error as the source.
    ///
    /// # Example
    ///
    /// ```
    /// use std::error::Error;
    /// use std::io;
    ///
    /// use attendance_engine::error::EngineError;
    ///
    /// let io_error = io::Error::new(io::ErrorKind::TimedOut, "database timed out");
    /// let error = EngineError::persistence("loading time records", io_error);
    ///
    /// assert_eq!(error.to_string(), "Persistence error: loading time records");
    /// assert_eq!(error.source().unwrap().to_string(), "database timed out");
    /// ```
    pub fn persistence(message: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        EngineError::Persistence {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Shorthand for a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_punch_displays_type_and_date() {
        let error = EngineError::DuplicatePunch {
            punch_type: RecordType::Entry,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate punch: ENTRY already registered on 2026-03-10"
        );
        assert_eq!(error.kind(), ErrorKind::SequenceViolation);
    }

    #[test]
    fn test_out_of_sequence_names_missing_predecessor() {
        let error = EngineError::OutOfSequence {
            punch_type: RecordType::Exit,
            missing: RecordType::LunchEnd,
        };
        assert_eq!(
            error.to_string(),
            "Out of sequence: EXIT requires a prior LUNCH_END"
        );
    }

    #[test]
    fn test_day_complete_is_sequence_violation() {
        let error = EngineError::DayComplete {
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        };
        assert_eq!(error.kind(), ErrorKind::SequenceViolation);
    }

    #[test]
    fn test_not_found_kinds() {
        let employee = EngineError::EmployeeNotFound {
            employee_id: "x".to_string(),
        };
        let record = EngineError::RecordNotFound {
            record_id: Uuid::nil(),
        };
        assert_eq!(employee.kind(), ErrorKind::NotFound);
        assert_eq!(record.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_validation_helper() {
        let error = EngineError::validation("hours", "must be positive");
        assert_eq!(error.to_string(), "Invalid field 'hours': must be positive");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_persistence() -> EngineResult<()> {
            Err(EngineError::persistence("saving time record", "connection reset"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_persistence()?;
            Ok(())
        }

        let err = propagates_error().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_persistence_keeps_the_collaborator_error() {
        use std::error::Error;
        use std::io;

        let error = EngineError::persistence(
            "saving time record",
            io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"),
        );

        assert_eq!(error.to_string(), "Persistence error: saving time record");
        assert_eq!(error.kind(), ErrorKind::Persistence);
        let source = error
            .source()
            .and_then(|e| e.downcast_ref::<io::Error>())
            .unwrap();
        assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
    }
}
