use super::percentage;
use crate::error::Result;
use crate::utils::nan_as_null;
use polars::prelude::*;

/// Percentage of distinct values in a column.
///
/// Missing cells (null or NaN) are counted as one more distinct value. An
/// empty column scores `0.0`.
pub fn uniqueness_score(column: &Series) -> Result<f64> {
    let total = column.len();
    if total == 0 {
        return Ok(0.0);
    }

    let distinct = nan_as_null(column)?.n_unique()?;
    Ok(percentage(distinct, total))
}
