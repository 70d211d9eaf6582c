//! Configuration loading and management for the Attendance Engine.
//!
//! This module loads the company settings and the business timezone from a
//! YAML file.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Tolerance: {} minutes", config.settings().tolerance_minutes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BusinessTimezone, CompanySettings, EngineConfig, SettingsFile};
