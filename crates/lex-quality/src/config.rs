//! Configuration types for scoring runs and report output.
//!
//! Both configurations use the builder pattern and are validated on
//! `build()`. They are plain serde structs so they can also be loaded from
//! JSON.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default pass mark (in percent) used by the quality summary.
pub const DEFAULT_PASS_MARK: f64 = 80.0;

/// Configuration for a scoring run.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::config::ScoringConfig;
///
/// let config = ScoringConfig::builder()
///     .reference_time(threshold)
///     .accuracy_tolerance(0.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Threshold for the Timeliness metric. Datetime cells at or after this
    /// moment are timely.
    /// Default: None (resolved to the local current time at the start of a run)
    pub reference_time: Option<NaiveDateTime>,

    /// Absolute tolerance for numeric Accuracy comparisons.
    /// Default: None (exact equality)
    pub accuracy_tolerance: Option<f64>,
}

impl ScoringConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(tolerance) = self.accuracy_tolerance
            && (!tolerance.is_finite() || tolerance < 0.0)
        {
            return Err(ConfigValidationError::InvalidTolerance(tolerance));
        }
        Ok(())
    }
}

/// Builder for [`ScoringConfig`].
#[derive(Debug, Default)]
pub struct ScoringConfigBuilder {
    reference_time: Option<NaiveDateTime>,
    accuracy_tolerance: Option<f64>,
}

impl ScoringConfigBuilder {
    /// Set the Timeliness threshold.
    pub fn reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Set the numeric Accuracy tolerance.
    ///
    /// # Arguments
    /// * `tolerance` - Non-negative absolute difference (e.g., 0.5)
    pub fn accuracy_tolerance(mut self, tolerance: f64) -> Self {
        self.accuracy_tolerance = Some(tolerance);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ScoringConfig, ConfigValidationError> {
        let config = ScoringConfig {
            reference_time: self.reference_time,
            accuracy_tolerance: self.accuracy_tolerance,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for report output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the HTML and JSON reports are written to.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// File name of the reports (without extension).
    /// Default: "data_quality_report"
    pub output_name: String,

    /// Score (in percent) a column needs on a metric to count as passing.
    /// Default: 80.0
    pub pass_mark: f64,

    /// Overall score (in percent) at or above which quality is called good.
    /// Default: 80.0
    pub good_quality_mark: f64,

    /// Title of the HTML document.
    /// Default: "Data Quality Report"
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            output_name: "data_quality_report".to_string(),
            pass_mark: DEFAULT_PASS_MARK,
            good_quality_mark: DEFAULT_PASS_MARK,
            title: "Data Quality Report".to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("pass_mark", self.pass_mark),
            ("good_quality_mark", self.good_quality_mark),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidMark {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.output_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOutputName);
        }

        Ok(())
    }
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    pass_mark: Option<f64>,
    good_quality_mark: Option<f64>,
    title: Option<String>,
}

impl ReportConfigBuilder {
    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the report file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the per-metric pass mark used by the quality summary.
    pub fn pass_mark(mut self, mark: f64) -> Self {
        self.pass_mark = Some(mark);
        self
    }

    /// Set the overall score at which quality is reported as good.
    pub fn good_quality_mark(mut self, mark: f64) -> Self {
        self.good_quality_mark = Some(mark);
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_name: self.output_name.unwrap_or(defaults.output_name),
            pass_mark: self.pass_mark.unwrap_or(defaults.pass_mark),
            good_quality_mark: self.good_quality_mark.unwrap_or(defaults.good_quality_mark),
            title: self.title.unwrap_or(defaults.title),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid accuracy tolerance: {0} (must be a finite, non-negative number)")]
    InvalidTolerance(f64),

    #[error("Invalid mark for '{field}': {value} (must be between 0 and 100)")]
    InvalidMark { field: String, value: f64 },

    #[error("Output name must not be empty")]
    EmptyOutputName,
}

impl From<ConfigValidationError> for crate::error::QualityError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::QualityError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert!(config.reference_time.is_none());
        assert!(config.accuracy_tolerance.is_none());
    }

    #[test]
    fn test_scoring_builder_custom_values() {
        let when = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let config = ScoringConfig::builder()
            .reference_time(when)
            .accuracy_tolerance(0.25)
            .build()
            .unwrap();

        assert_eq!(config.reference_time, Some(when));
        assert_eq!(config.accuracy_tolerance, Some(0.25));
    }

    #[test]
    fn test_validation_negative_tolerance() {
        let result = ScoringConfig::builder().accuracy_tolerance(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTolerance(_)
        ));
    }

    #[test]
    fn test_validation_nan_tolerance() {
        let result = ScoringConfig::builder().accuracy_tolerance(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_report_builder_defaults() {
        let config = ReportConfig::builder().build().unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.pass_mark, 80.0);
    }

    #[test]
    fn test_validation_invalid_pass_mark() {
        let result = ReportConfig::builder().pass_mark(120.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMark { .. }
        ));
    }

    #[test]
    fn test_validation_empty_output_name() {
        let result = ReportConfig::builder().output_name("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyOutputName
        ));
    }

    #[test]
    fn test_scoring_config_from_json() {
        let json = r#"{
            "reference_time": "2024-03-01T00:00:00",
            "accuracy_tolerance": 0.1
        }"#;

        let config: ScoringConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(
            config.reference_time,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
        assert_eq!(config.accuracy_tolerance, Some(0.1));
    }

    #[test]
    fn test_report_config_serialization() {
        let config = ReportConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ReportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
