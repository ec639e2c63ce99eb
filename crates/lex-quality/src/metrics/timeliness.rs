use super::percentage;
use crate::error::{QualityError, Result};
use crate::utils::{is_datetime_dtype, temporal_values};
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Percentage of datetime cells at or after `threshold`.
///
/// Columns that are not date/datetime typed score `100.0` and the threshold
/// is not consulted. For datetime columns the threshold is required.
/// Timezone-aware cells are compared by their local wall clock against the
/// naive threshold. Missing cells never count as timely.
pub fn timeliness_score(column: &Series, threshold: Option<NaiveDateTime>) -> Result<f64> {
    if !is_datetime_dtype(column.dtype()) {
        return Ok(100.0);
    }

    let threshold = threshold.ok_or_else(|| QualityError::MissingThreshold {
        column: column.name().to_string(),
    })?;

    let total = column.len();
    if total == 0 {
        return Ok(0.0);
    }

    let timely = temporal_values(column)?
        .into_iter()
        .filter(|value| value.is_some_and(|ts| ts >= threshold))
        .count();

    Ok(percentage(timely, total))
}
