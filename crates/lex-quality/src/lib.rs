//! Data Quality Scoring Library
//!
//! Column-level and cross-dataset data quality scoring built on Polars.
//!
//! # Overview
//!
//! Every column of a dataset is scored on six metrics, each a percentage in
//! `[0, 100]`:
//!
//! - **Completeness**: share of non-missing cells
//! - **Timeliness**: share of datetime cells at or after a reference time
//! - **Validity**: share of cells accepted by a validator (e-mail columns)
//! - **Accuracy**: share of cells matching a reference dataset
//! - **Uniqueness**: distinct values relative to row count
//! - **Consistency**: share of rows agreeing with a reference dataset
//!
//! Accuracy and Consistency compare the two datasets row by row, so both
//! must hold the same number of rows.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_quality::{QualityScorer, ScoringConfig, load_dataset};
//! use chrono::NaiveDate;
//!
//! let primary = load_dataset("data/orders.csv")?;
//! let reference = load_dataset("data/orders_reference.csv")?;
//!
//! let config = ScoringConfig::builder()
//!     .reference_time(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
//!     .accuracy_tolerance(0.01)
//!     .build()?;
//!
//! let scores = QualityScorer::new(config).score(&primary, &reference)?;
//! println!("Overall: {:.2}%", scores.overall_score);
//! for row in scores.matrix.rows() {
//!     println!("{}: {:?}", row.column, row.scores);
//! }
//! ```
//!
//! # Reports
//!
//! See the [`reporting`] module for the HTML page and the JSON/CSV outputs.

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod preprocess;
pub mod reporting;
pub mod scoring;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, ReportConfig, ReportConfigBuilder, ScoringConfig, ScoringConfigBuilder,
};
pub use error::{DatasetRole, QualityError, Result as QualityResult, ResultExt};
pub use loader::{load_dataset, load_dataset_from_str};
pub use metrics::{
    DefaultValidator, EmailValidator, Metric, Validator, accuracy_score, completeness_score,
    consistency_score, timeliness_score, uniqueness_score, validity_score,
};
pub use preprocess::{PreprocessSpec, preprocess_dataset};
pub use reporting::{HtmlReportWriter, QualityLevel, QualityReport, ReportGenerator};
pub use scoring::{
    ColumnScores, MetricPlan, MetricScores, MetricTask, QualityScorer, QualityScores, ScoreMatrix,
};
