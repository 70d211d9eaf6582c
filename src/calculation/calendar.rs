//! Calendar rule table.
//!
//! Maps a date to its expected working hours and a punch time to the
//! overtime premium that applies to hours beyond the expected amount.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expected hours Monday to Thursday.
pub const LONG_DAY_HOURS: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// Expected hours on Friday. Together with the long days this makes a 44h week.
pub const FRIDAY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Hour of day from which weekday overtime is paid at the night premium.
pub const NIGHT_PREMIUM_START_HOUR: u32 = 22;

/// 150% premium.
pub const PREMIUM_150: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// 200% premium.
pub const PREMIUM_200: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Represents the type of day for expected hours and premiums.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::DayType;
///
/// let day_type = DayType::Saturday;
/// assert_eq!(format!("{:?}", day_type), "Saturday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday: no expected hours, 150% premium.
    Saturday,
    /// Sunday: no expected hours, 200% premium.
    Sunday,
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
        }
    }
}

impl From<Weekday> for DayType {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => DayType::Saturday,
            Weekday::Sun => DayType::Sunday,
            _ => DayType::Weekday,
        }
    }
}

/// Determines the day type for a given date.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{get_day_type, DayType};
/// use chrono::NaiveDate;
///
/// // 2026-01-17 is a Saturday
/// assert_eq!(get_day_type(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()), DayType::Saturday);
/// // 2026-01-12 is a Monday
/// assert_eq!(get_day_type(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()), DayType::Weekday);
/// ```
pub fn get_day_type(date: NaiveDate) -> DayType {
    date.weekday().into()
}

/// Returns the hours an employee is expected to work on `date`.
///
/// Monday to Thursday are 9h, Friday is 8h, weekends are 0h. The result
/// depends only on the day of the week.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::expected_hours;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let tuesday = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let friday = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
/// assert_eq!(expected_hours(tuesday), Decimal::new(9, 0));
/// assert_eq!(expected_hours(friday), Decimal::new(8, 0));
/// ```
pub fn expected_hours(date: NaiveDate) -> Decimal {
    match date.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => LONG_DAY_HOURS,
        Weekday::Fri => FRIDAY_HOURS,
        Weekday::Sat | Weekday::Sun => Decimal::ZERO,
    }
}

/// Returns the premium multiplier for overtime started at `timestamp`.
///
/// - Sunday: 2.0
/// - Saturday: 1.5
/// - Weekday at or after 22:00: 2.0
/// - Weekday before 22:00: 1.5
///
/// The multiplier applies only to hours beyond [`expected_hours`].
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::overtime_premium;
/// use chrono::{NaiveDateTime, Weekday};
/// use rust_decimal::Decimal;
///
/// let late = NaiveDateTime::parse_from_str("2026-03-10 22:15:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(overtime_premium(late, Weekday::Tue), Decimal::new(2, 0));
/// ```
pub fn overtime_premium(timestamp: NaiveDateTime, day_of_week: Weekday) -> Decimal {
    match DayType::from(day_of_week) {
        DayType::Sunday => PREMIUM_200,
        DayType::Saturday => PREMIUM_150,
        DayType::Weekday if timestamp.hour() >= NIGHT_PREMIUM_START_HOUR => PREMIUM_200,
        DayType::Weekday => PREMIUM_150,
    }
}
