//! Employee model.
//!
//! Employees are owned by the HR collaborator. The engine only reads the
//! hire date, the schedule description and the daily voucher amounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An employee whose punches are tracked by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The date the employee was hired. Nothing before it is ever charged.
    pub hire_date: NaiveDate,
    /// Free-text description of the employee's work schedule.
    #[serde(default)]
    pub work_schedule_rules: Option<String>,
    /// The cost center the employee is booked against.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Food voucher amount granted for each worked day.
    #[serde(default)]
    pub daily_food_voucher: Decimal,
    /// Transport voucher amount granted for each worked day.
    #[serde(default)]
    pub daily_transport_voucher: Decimal,
}

impl Employee {
    /// Creates an employee with no vouchers and no schedule notes.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee::new("emp_001", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    /// assert!(employee.was_employed_on(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    /// assert!(!employee.was_employed_on(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    /// ```
    pub fn new(id: impl Into<String>, hire_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            hire_date,
            work_schedule_rules: None,
            cost_center: None,
            daily_food_voucher: Decimal::ZERO,
            daily_transport_voucher: Decimal::ZERO,
        }
    }

    /// Returns true if the employee had been hired by `date`.
    pub fn was_employed_on(&self, date: NaiveDate) -> bool {
        date >= self.hire_date
    }
}
