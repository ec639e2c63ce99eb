//! Error types for the quality scoring engine.
//!
//! All fallible operations in the crate return [`QualityError`]. Errors are
//! serializable as `{code, message}` so they can be handed to a frontend or
//! emitted as part of a JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use thiserror::Error;

/// Which side of a scoring run a dataset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatasetRole {
    /// The dataset being scored.
    Primary,
    /// The dataset the primary one is compared against.
    Reference,
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// The main error type for quality scoring.
#[derive(Error, Debug)]
pub enum QualityError {
    /// A column required by a cross-dataset metric is absent.
    #[error("Column '{column}' not found in {dataset} dataset")]
    MissingColumn { column: String, dataset: DatasetRole },

    /// Timeliness was evaluated on a datetime column without a threshold.
    #[error("Threshold date must be provided to score timeliness of column '{column}'")]
    MissingThreshold { column: String },

    /// The two datasets cannot be compared row by row.
    #[error(
        "Datasets are not positionally aligned: primary has {primary_rows} rows, reference has {reference_rows}"
    )]
    Alignment {
        primary_rows: usize,
        reference_rows: usize,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dataset has no rows or no columns.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// A preprocessing conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    Preprocessing {
        column: String,
        target_type: String,
        reason: String,
    },

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn { .. } => "MISSING_COLUMN",
            Self::MissingThreshold { .. } => "MISSING_THRESHOLD",
            Self::Alignment { .. } => "ALIGNMENT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::Preprocessing { .. } => "PREPROCESSING_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &QualityError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error comes from comparing the two datasets.
    pub fn is_cross_dataset(&self) -> bool {
        matches!(
            self.root(),
            Self::MissingColumn { .. } | Self::Alignment { .. }
        )
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}
