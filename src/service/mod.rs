//! Outward operations of the Attendance Engine.
//!
//! [`AttendanceService`] ties the storage seam, the configuration, and a
//! [`Clock`] to the pure calculators.

mod clock;
mod engine;
mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{AbsenceInjection, AttendanceService};
pub use summary::{DailySummary, summarize_day};
