use super::{aligned_columns, percentage};
use crate::error::Result;
use crate::utils::{cells_equal, comparable_series, is_missing};
use polars::prelude::*;

/// Percentage of rows where the primary and reference cells agree.
///
/// A row is consistent when both cells are missing or both are present and
/// equal. `reference_column` defaults to `column`. An empty dataset is
/// vacuously consistent (`100.0`).
///
/// # Errors
///
/// `MissingColumn` if either column is absent, `Alignment` if the datasets
/// differ in row count.
pub fn consistency_score(
    primary: &DataFrame,
    reference: &DataFrame,
    column: &str,
    reference_column: Option<&str>,
) -> Result<f64> {
    let reference_column = reference_column.unwrap_or(column);
    let (left, right) = aligned_columns(primary, reference, column, reference_column)?;

    let total = primary.height();
    if total == 0 {
        return Ok(100.0);
    }

    let left = comparable_series(left)?;
    let right = comparable_series(right)?;

    let mut consistent = 0usize;
    for idx in 0..total {
        let (a, b) = (left.get(idx)?, right.get(idx)?);
        if (is_missing(&a) && is_missing(&b)) || cells_equal(&a, &b) {
            consistent += 1;
        }
    }

    Ok(percentage(consistent, total))
}
