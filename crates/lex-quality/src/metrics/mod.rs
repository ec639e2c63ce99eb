//! Metric calculators.
//!
//! Each quality dimension lives in its own module and is a pure function
//! over one column (Completeness, Uniqueness, Validity, Timeliness) or over
//! a column pair taken from two positionally aligned datasets (Accuracy,
//! Consistency). Scores are percentages in `[0, 100]`.
//!
//! Empty input does not fail. The single-column metrics score an empty
//! column as `0.0`, while the cross-dataset metrics treat an empty
//! denominator as vacuously satisfied and score it `100.0`.

mod accuracy;
mod completeness;
mod consistency;
mod timeliness;
mod uniqueness;
mod validity;

pub use accuracy::accuracy_score;
pub use completeness::completeness_score;
pub use consistency::consistency_score;
pub use timeliness::timeliness_score;
pub use uniqueness::uniqueness_score;
pub use validity::{DefaultValidator, EmailValidator, Validator, validity_score};

use crate::error::{DatasetRole, QualityError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quality dimension. The declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Completeness,
    Timeliness,
    Validity,
    Accuracy,
    Uniqueness,
    Consistency,
}

impl Metric {
    /// Every metric, in reporting order.
    pub const ALL: [Metric; 6] = [
        Metric::Completeness,
        Metric::Timeliness,
        Metric::Validity,
        Metric::Accuracy,
        Metric::Uniqueness,
        Metric::Consistency,
    ];

    /// Display name of the metric.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Timeliness => "Timeliness",
            Self::Validity => "Validity",
            Self::Accuracy => "Accuracy",
            Self::Uniqueness => "Uniqueness",
            Self::Consistency => "Consistency",
        }
    }

    /// Position of the metric in [`Metric::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Percentage of `part` in `whole`. Callers handle `whole == 0`.
#[inline]
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// Look up a column pair for a cross-dataset comparison.
///
/// Fails with [`QualityError::MissingColumn`] when either column is absent
/// and with [`QualityError::Alignment`] when the datasets differ in height,
/// since rows are paired by position.
pub(crate) fn aligned_columns<'a>(
    primary: &'a DataFrame,
    reference: &'a DataFrame,
    primary_column: &str,
    reference_column: &str,
) -> Result<(&'a Series, &'a Series)> {
    let left = primary
        .column(primary_column)
        .map_err(|_| QualityError::MissingColumn {
            column: primary_column.to_string(),
            dataset: DatasetRole::Primary,
        })?;
    let right = reference
        .column(reference_column)
        .map_err(|_| QualityError::MissingColumn {
            column: reference_column.to_string(),
            dataset: DatasetRole::Reference,
        })?;

    if primary.height() != reference.height() {
        return Err(QualityError::Alignment {
            primary_rows: primary.height(),
            reference_rows: reference.height(),
        });
    }

    Ok((left.as_materialized_series(), right.as_materialized_series()))
}
