use super::{aligned_columns, percentage};
use crate::error::Result;
use crate::utils::{
    ColumnKind, cells_equal, comparable_series, count_missing, numeric_value, series_kind,
};
use polars::prelude::*;

/// Percentage of rows where `primary[column]` matches `reference[column]`.
///
/// With a `tolerance` and a numeric primary column a row is correct when
/// `|primary - reference| <= tolerance`; otherwise the cells must be equal
/// under [`cells_equal`]. Missing cells on either side are never correct.
///
/// The denominator is the number of non-missing cells in the primary
/// column only. When it is zero the column is vacuously accurate (`100.0`).
///
/// # Errors
///
/// `MissingColumn` if the column is absent from either dataset, `Alignment`
/// if the datasets differ in row count.
pub fn accuracy_score(
    primary: &DataFrame,
    reference: &DataFrame,
    column: &str,
    tolerance: Option<f64>,
) -> Result<f64> {
    let (left, right) = aligned_columns(primary, reference, column, column)?;
    let tolerance = tolerance.filter(|_| series_kind(left) == ColumnKind::Numeric);
    let left = comparable_series(left)?;
    let right = comparable_series(right)?;

    let mut correct = 0usize;
    for idx in 0..left.len() {
        let (a, b) = (left.get(idx)?, right.get(idx)?);
        let matches = match tolerance {
            Some(tol) => match (numeric_value(&a), numeric_value(&b)) {
                (Some(x), Some(y)) => (x - y).abs() <= tol,
                _ => false,
            },
            None => cells_equal(&a, &b),
        };
        if matches {
            correct += 1;
        }
    }

    let present = left.len() - count_missing(&left)?;
    if present == 0 {
        return Ok(100.0);
    }

    Ok(percentage(correct, present))
}
