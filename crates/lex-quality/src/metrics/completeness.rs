use super::percentage;
use crate::error::Result;
use crate::utils::count_missing;
use polars::prelude::*;

/// Percentage of non-missing cells in a column.
///
/// An empty column scores `0.0`: emptiness is not treated as complete.
pub fn completeness_score(column: &Series) -> Result<f64> {
    let total = column.len();
    if total == 0 {
        return Ok(0.0);
    }

    let missing = count_missing(column)?;
    Ok(percentage(total - missing, total))
}
