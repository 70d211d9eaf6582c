//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{BusinessTimezone, CompanySettings, EngineConfig, SettingsFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── settings.yaml   # Company settings and business UTC offset
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Work starts at {}", loader.settings().work_start_time);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads `settings.yaml` from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if the file is
    /// missing, is not valid YAML, or holds values the engine cannot use.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let settings_path = path.as_ref().join("settings.yaml");
        let path_str = settings_path.display().to_string();

        let content =
            fs::read_to_string(&settings_path).map_err(|_| EngineError::ConfigNotFound {
                path: path_str.clone(),
            })?;

        Self::parse(&content, &path_str)
    }

    /// Parses settings from an in-memory YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str("company:\n  tolerance_minutes: 5\n").unwrap();
    /// assert_eq!(loader.settings().tolerance_minutes, 5);
    /// assert_eq!(loader.settings().vacation_days_per_year, 30);
    /// ```
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        let file: SettingsFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        let timezone = BusinessTimezone::from_offset_minutes(file.utc_offset_minutes).ok_or_else(
            || {
                invalid(format!(
                    "utc_offset_minutes {} is out of range",
                    file.utc_offset_minutes
                ))
            },
        )?;

        Self::validate(&file.company).map_err(invalid)?;

        Ok(Self {
            config: EngineConfig::new(file.company, timezone),
        })
    }

    fn validate(settings: &CompanySettings) -> Result<(), String> {
        if settings.work_start_time >= settings.work_end_time {
            return Err(format!(
                "work_start_time {} must be before work_end_time {}",
                settings.work_start_time, settings.work_end_time
            ));
        }
        if settings.vacation_days_per_year == 0 {
            return Err("vacation_days_per_year must be positive".to_string());
        }
        if settings.max_overtime_hours.is_sign_negative() || settings.max_overtime_hours.is_zero()
        {
            return Err("max_overtime_hours must be positive".to_string());
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the company settings.
    pub fn settings(&self) -> &CompanySettings {
        &self.config.settings
    }

    /// Returns the business timezone.
    pub fn timezone(&self) -> BusinessTimezone {
        self.config.timezone
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    #[test]
    fn test_load_sample_config() {
        let loader = ConfigLoader::load("./config").unwrap();
        assert_eq!(
            loader.settings().work_start_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
        assert_eq!(loader.settings().vacation_days_per_year, 30);
        assert_eq!(loader.timezone().offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_missing_directory_is_config_not_found() {
        let err = ConfigLoader::load("./does/not/exist").unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_full_inline_config() {
        let yaml = r#"
company:
  work_start_time: "07:30:00"
  work_end_time: "17:00:00"
  tolerance_minutes: 5
  vacation_days_per_year: 30
  max_overtime_hours: "2.5"
utc_offset_minutes: -240
"#;
        let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
        assert_eq!(
            loader.settings().work_start_time,
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        assert_eq!(loader.settings().max_overtime_hours, Decimal::new(25, 1));
        assert_eq!(loader.timezone().offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str("{}").unwrap();
        assert_eq!(loader.settings(), &CompanySettings::default());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ConfigLoader::from_yaml_str("company: [unclosed").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }

    #[test]
    fn test_inverted_work_hours_rejected() {
        let yaml = "company:\n  work_start_time: \"18:00:00\"\n  work_end_time: \"08:00:00\"\n";
        let err = ConfigLoader::from_yaml_str(yaml).unwrap_err();
        match err {
            EngineError::ConfigParseError { message, .. } => {
                assert!(message.contains("must be before"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let err = ConfigLoader::from_yaml_str("utc_offset_minutes: 2000\n").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }
}
