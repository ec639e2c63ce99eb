//! Shared utilities for the quality scoring engine.
//!
//! Column kind detection, missing-value handling and the cell equality rule
//! used by the cross-dataset metrics live here so every calculator agrees on
//! them.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;
use polars::prelude::*;
use std::borrow::Cow;

// =============================================================================
// Column Kind Utilities
// =============================================================================

/// Declared kind of a column, derived from its polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer, float and boolean columns
    Numeric,
    /// Date or datetime columns
    Datetime,
    /// String and categorical columns
    Text,
    /// Anything else (lists, structs, binary, time of day, ...)
    Other,
}

impl ColumnKind {
    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Datetime => "datetime",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a calendar date or timestamp.
///
/// Time-of-day columns are not included: they cannot be compared against a
/// threshold date.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Check if a DataType holds text values.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Get the kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean) {
        ColumnKind::Numeric
    } else if is_datetime_dtype(dtype) {
        ColumnKind::Datetime
    } else if is_text_dtype(dtype) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

/// Get the kind of a Series.
pub fn series_kind(series: &Series) -> ColumnKind {
    column_kind(series.dtype())
}

/// Return a view of the series whose cells can be compared by value.
///
/// Categorical columns are rendered as strings; everything else is
/// borrowed unchanged.
pub fn comparable_series(series: &Series) -> PolarsResult<Cow<'_, Series>> {
    match series.dtype() {
        DataType::Categorical(_, _) => Ok(Cow::Owned(series.cast(&DataType::String)?)),
        _ => Ok(Cow::Borrowed(series)),
    }
}

// =============================================================================
// Cell Utilities
// =============================================================================

/// Whether a cell counts as missing: null, or NaN in a float column.
#[inline]
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Count missing cells (nulls plus float NaNs) in a Series.
pub fn count_missing(series: &Series) -> PolarsResult<usize> {
    let nan_count = match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let floats = series.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .filter(|v| v.is_some_and(f64::is_nan))
                .count()
        }
        _ => 0,
    };
    Ok(series.null_count() + nan_count)
}

/// Fold float NaN into null so both count as the same missing value.
///
/// Non-float series are borrowed unchanged.
pub fn nan_as_null(series: &Series) -> PolarsResult<Cow<'_, Series>> {
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let floats = series.cast(&DataType::Float64)?;
            let folded: Float64Chunked = floats
                .f64()?
                .into_iter()
                .map(|v| v.filter(|v| !v.is_nan()))
                .collect();
            Ok(Cow::Owned(folded.with_name(series.name().clone()).into_series()))
        }
        _ => Ok(Cow::Borrowed(series)),
    }
}

/// Numeric value of a cell, if it holds a number or a boolean.
pub fn numeric_value(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        v if is_numeric_dtype(&v.dtype()) => v.extract::<f64>(),
        _ => None,
    }
}

/// Exact value of an integer cell.
fn integer_value(value: &AnyValue<'_>) -> Option<i128> {
    match value {
        AnyValue::Int8(v) => Some(i128::from(*v)),
        AnyValue::Int16(v) => Some(i128::from(*v)),
        AnyValue::Int32(v) => Some(i128::from(*v)),
        AnyValue::Int64(v) => Some(i128::from(*v)),
        AnyValue::UInt8(v) => Some(i128::from(*v)),
        AnyValue::UInt16(v) => Some(i128::from(*v)),
        AnyValue::UInt32(v) => Some(i128::from(*v)),
        AnyValue::UInt64(v) => Some(i128::from(*v)),
        _ => None,
    }
}

/// Text value of a cell, if it holds a string.
pub fn string_value<'a>(value: &'a AnyValue<'_>) -> Option<&'a str> {
    match value {
        AnyValue::String(s) => Some(*s),
        AnyValue::StringOwned(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Render a cell the way a validator sees it.
pub fn render_value(value: &AnyValue<'_>) -> String {
    match string_value(value) {
        Some(s) => s.to_string(),
        None => format!("{}", value),
    }
}

/// Value equality used by the Accuracy and Consistency metrics.
///
/// A missing cell is never equal to anything, including another missing
/// cell. Two integers compare exactly; other numbers compare by value
/// across dtypes (`1 == 1.0`). Strings compare by text and a number never
/// equals a string.
pub fn cells_equal(left: &AnyValue<'_>, right: &AnyValue<'_>) -> bool {
    if is_missing(left) || is_missing(right) {
        return false;
    }

    if let (Some(a), Some(b)) = (integer_value(left), integer_value(right)) {
        return a == b;
    }

    match (numeric_value(left), numeric_value(right)) {
        (Some(a), Some(b)) => return a == b,
        (Some(_), None) | (None, Some(_)) => return false,
        (None, None) => {}
    }

    match (string_value(left), string_value(right)) {
        (Some(a), Some(b)) => a == b,
        (Some(_), None) | (None, Some(_)) => false,
        (None, None) => left == right,
    }
}

// =============================================================================
// Temporal Utilities
// =============================================================================

/// Zone attached to a timezone-aware datetime column.
#[derive(Debug, Clone, Copy)]
enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    fn parse(name: &str) -> PolarsResult<Self> {
        if let Ok(tz) = name.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }
        let message = format!("unknown time zone '{}'", name);
        name.parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| PolarsError::ComputeError(message.into()))
    }

    /// Wall-clock time of a UTC instant in this zone.
    fn local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Named(tz) => utc.with_timezone(tz).naive_local(),
            Self::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        }
    }
}

/// Convert a physical timestamp into a naive datetime.
///
/// Without a zone the UTC clock is used.
fn timestamp_to_naive(value: i64, unit: TimeUnit, zone: Option<&Zone>) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }?;
    Some(match zone {
        Some(zone) => zone.local(utc),
        None => utc.naive_utc(),
    })
}

/// Convert days since the Unix epoch into a naive datetime at midnight.
fn days_to_naive(days: i32) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0).map(|dt| dt.naive_utc())
}

/// Extract the cells of a date/datetime Series as naive datetimes.
///
/// Timezone-aware columns are read by their local wall clock in the
/// column's zone, dates as midnight. Nulls map to `None`.
pub fn temporal_values(series: &Series) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    match series.dtype() {
        DataType::Datetime(unit, tz) => {
            let unit = *unit;
            let zone = tz.as_ref().map(|tz| Zone::parse(tz.as_str())).transpose()?;
            let physical = series.to_physical_repr().cast(&DataType::Int64)?;
            Ok(physical
                .i64()?
                .into_iter()
                .map(|v| v.and_then(|v| timestamp_to_naive(v, unit, zone.as_ref())))
                .collect())
        }
        DataType::Date => {
            let physical = series.to_physical_repr().cast(&DataType::Int32)?;
            Ok(physical
                .i32()?
                .into_iter()
                .map(|v| v.and_then(days_to_naive))
                .collect())
        }
        other => Err(PolarsError::InvalidOperation(
            format!("expected a date or datetime column, got {}", other).into(),
        )),
    }
}

/// Column names of a DataFrame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
