//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML settings file.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company-wide settings, read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySettings {
    /// Scheduled start of the working day.
    #[serde(default = "default_work_start_time")]
    pub work_start_time: NaiveTime,
    /// Scheduled end of the working day.
    #[serde(default = "default_work_end_time")]
    pub work_end_time: NaiveTime,
    /// Minutes of lateness or early departure tolerated without a note.
    #[serde(default = "default_tolerance_minutes")]
    pub tolerance_minutes: u32,
    /// Vacation days earned per acquisitive period.
    #[serde(default = "default_vacation_days_per_year")]
    pub vacation_days_per_year: u32,
    /// Largest overtime request a single day may carry.
    #[serde(default = "default_max_overtime_hours")]
    pub max_overtime_hours: Decimal,
}

fn default_work_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_work_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_tolerance_minutes() -> u32 {
    10
}

fn default_vacation_days_per_year() -> u32 {
    30
}

fn default_max_overtime_hours() -> Decimal {
    Decimal::new(2, 0)
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            work_start_time: default_work_start_time(),
            work_end_time: default_work_end_time(),
            tolerance_minutes: default_tolerance_minutes(),
            vacation_days_per_year: default_vacation_days_per_year(),
            max_overtime_hours: default_max_overtime_hours(),
        }
    }
}

/// The timezone all wall-clock values are expressed in.
///
/// Punch timestamps and "today" are always derived through this offset,
/// never through the host's local time.
///
/// # Example
///
/// ```
/// use attendance_engine::config::BusinessTimezone;
/// use chrono::{TimeZone, Utc};
///
/// let tz = BusinessTimezone::from_offset_minutes(-180).unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 3, 11, 1, 30, 0).unwrap();
/// // 01:30 UTC is still the previous evening in São Paulo.
/// assert_eq!(tz.today(now).to_string(), "2026-03-10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessTimezone {
    offset: FixedOffset,
}

impl BusinessTimezone {
    /// Builds a timezone from its UTC offset in minutes (e.g. -180 for UTC-3).
    ///
    /// Returns `None` if the offset is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    /// Brasília time (UTC-3), which has had no daylight saving since 2019.
    pub fn brasilia() -> Self {
        Self::from_offset_minutes(-180).unwrap_or(Self { offset: Utc.fix() })
    }

    /// The underlying offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Converts an instant to business-local wall-clock time.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// The business-local calendar day of an instant.
    pub fn today(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date()
    }
}

impl Default for BusinessTimezone {
    fn default() -> Self {
        Self::brasilia()
    }
}

/// Settings file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsFile {
    /// Company settings.
    #[serde(default)]
    pub company: CompanySettings,
    /// Business UTC offset in minutes.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset_minutes() -> i32 {
    -180
}

/// The complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Company settings.
    pub settings: CompanySettings,
    /// Business timezone.
    pub timezone: BusinessTimezone,
}

impl EngineConfig {
    /// Creates a configuration from its component parts.
    pub fn new(settings: CompanySettings, timezone: BusinessTimezone) -> Self {
        Self { settings, timezone }
    }
}
