//! Column type preprocessing.
//!
//! Loaded CSV columns are mostly strings and integers. Before scoring, the
//! caller declares which columns hold dates, numbers, free text or
//! categories, and this module converts them. Conversions never fail on bad
//! values: anything that does not parse becomes missing.

use crate::error::{QualityError, Result};
use crate::utils::{column_names, is_datetime_dtype, is_numeric_dtype};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Datetime layouts tried, in order, when a date column has no format.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

/// Date layouts tried, in order, when a date column has no format.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Declared column types for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessSpec {
    pub date_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub text_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// `chrono` format string per date column.
    #[serde(default)]
    pub date_formats: HashMap<String, String>,
}

impl PreprocessSpec {
    pub fn is_empty(&self) -> bool {
        self.date_columns.is_empty()
            && self.numeric_columns.is_empty()
            && self.text_columns.is_empty()
            && self.categorical_columns.is_empty()
    }
}

/// Conversion applied to one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Date,
    Numeric,
    Text,
    Categorical,
}

impl Conversion {
    fn target_type(&self) -> &'static str {
        match self {
            Self::Date => "datetime",
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Categorical => "categorical",
        }
    }
}

/// Convert the declared columns of `df`.
///
/// Conversions run in the order dates, numbers, text, categories, so a
/// column listed twice ends up with the later type. Columns that are not in
/// the dataset are skipped.
pub fn preprocess_dataset(mut df: DataFrame, spec: &PreprocessSpec) -> Result<DataFrame> {
    if spec.is_empty() {
        return Ok(df);
    }

    let present = column_names(&df);
    let plan = [
        (&spec.date_columns, Conversion::Date),
        (&spec.numeric_columns, Conversion::Numeric),
        (&spec.text_columns, Conversion::Text),
        (&spec.categorical_columns, Conversion::Categorical),
    ];

    let mut converted = 0usize;
    for (columns, conversion) in plan {
        for name in columns {
            if !present.contains(name) {
                debug!(
                    "Skipping {} conversion of absent column '{}'",
                    conversion.target_type(),
                    name
                );
                continue;
            }

            let series = df.column(name)?.as_materialized_series().clone();
            let result = match conversion {
                Conversion::Date => {
                    to_datetime(&series, spec.date_formats.get(name).map(String::as_str))
                }
                Conversion::Numeric => to_numeric(&series),
                Conversion::Text => to_text(&series),
                Conversion::Categorical => to_categorical(&series),
            };

            let new_series = result.map_err(|e| QualityError::Preprocessing {
                column: name.clone(),
                target_type: conversion.target_type().to_string(),
                reason: e.to_string(),
            })?;
            df.replace(name, new_series)?;
            converted += 1;
        }
    }

    info!("Preprocessed {} columns", converted);
    Ok(df)
}

/// Parse a column into `Datetime(ms)`; unparsable values become null.
///
/// With `format` only that layout is accepted (as a datetime, or as a date
/// at midnight). Without it a list of common layouts and RFC 3339 are tried.
pub fn to_datetime(series: &Series, format: Option<&str>) -> PolarsResult<Series> {
    let target = DataType::Datetime(TimeUnit::Milliseconds, None);
    if is_datetime_dtype(series.dtype()) {
        return series.cast(&target);
    }

    let text = series.cast(&DataType::String)?;
    let millis: Vec<Option<i64>> = text
        .str()?
        .into_iter()
        .map(|value| {
            value
                .and_then(|raw| parse_datetime(raw.trim(), format))
                .map(|ts| ts.and_utc().timestamp_millis())
        })
        .collect();

    Series::new(series.name().clone(), millis).cast(&target)
}

fn parse_datetime(raw: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }

    if let Some(format) = format {
        return NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Convert a column to `Float64`; unparsable values become null.
pub fn to_numeric(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Boolean {
        return series.cast(&DataType::Float64);
    }

    let text = series.cast(&DataType::String)?;
    let values: Vec<Option<f64>> = text
        .str()?
        .into_iter()
        .map(|value| value.and_then(|raw| raw.trim().parse::<f64>().ok()))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Render a column as trimmed, lowercase text.
///
/// Nulls stay null rather than becoming the text "nan", so a missing cell
/// still lowers Completeness after conversion.
pub fn to_text(series: &Series) -> PolarsResult<Series> {
    let text = series.cast(&DataType::String)?;
    let values: Vec<Option<String>> = text
        .str()?
        .into_iter()
        .map(|value| value.map(|raw| raw.trim().to_lowercase()))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Convert a column to category values.
///
/// Categories are kept as their string labels, which is how every metric
/// compares and validates them.
pub fn to_categorical(series: &Series) -> PolarsResult<Series> {
    series.cast(&DataType::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ColumnKind, series_kind};

    #[test]
    fn test_to_datetime_default_formats() {
        let series = Series::new(
            "when".into(),
            &[Some("2024-01-02"), Some("2024-01-02 03:04:05"), Some("garbage"), None],
        );
        let parsed = to_datetime(&series, None).unwrap();

        assert_eq!(series_kind(&parsed), ColumnKind::Datetime);
        assert_eq!(parsed.null_count(), 2);
    }

    #[test]
    fn test_to_datetime_with_format() {
        let series = Series::new("when".into(), &["02/01/2024", "2024-01-02"]);
        let parsed = to_datetime(&series, Some("%d/%m/%Y")).unwrap();

        let values = crate::utils::temporal_values(&parsed).unwrap();
        assert_eq!(
            values[0],
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(values[1], None);
    }

    #[test]
    fn test_to_numeric_coerces_errors() {
        let series = Series::new("n".into(), &[Some(" 1.5 "), Some("abc"), None, Some("7")]);
        let parsed = to_numeric(&series).unwrap();

        assert_eq!(parsed.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = parsed.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.5), None, None, Some(7.0)]);
    }

    #[test]
    fn test_to_text_trims_and_lowercases() {
        let series = Series::new("t".into(), &[Some("  Oslo "), None]);
        let parsed = to_text(&series).unwrap();
        let values: Vec<Option<&str>> = parsed.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("oslo"), None]);
    }

    #[test]
    fn test_to_text_keeps_missing_cells_missing() {
        let series = Series::new("city".into(), &[Some("Lima"), None]);
        let parsed = to_text(&series).unwrap();
        assert_eq!(crate::metrics::completeness_score(&parsed).unwrap(), 50.0);
        assert!(!parsed.str().unwrap().into_iter().any(|v| v == Some("nan")));
    }

    #[test]
    fn test_preprocess_dataset_skips_absent_columns() {
        let df = df!(
            "joined" => ["2024-01-01", "bad"],
            "amount" => ["1", "x"],
            "city" => [" Rome", "OSLO"]
        )
        .unwrap();
        let spec = PreprocessSpec {
            date_columns: vec!["joined".to_string()],
            numeric_columns: vec!["amount".to_string(), "absent".to_string()],
            text_columns: vec!["city".to_string()],
            ..Default::default()
        };

        let out = preprocess_dataset(df, &spec).unwrap();
        assert_eq!(
            series_kind(out.column("joined").unwrap().as_materialized_series()),
            ColumnKind::Datetime
        );
        assert_eq!(out.column("amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(out.column("amount").unwrap().null_count(), 1);
        assert_eq!(
            out.column("city").unwrap().str().unwrap().get(0),
            Some("rome")
        );
    }

    #[test]
    fn test_empty_spec_is_noop() {
        let df = df!("a" => ["1"]).unwrap();
        let out = preprocess_dataset(df.clone(), &PreprocessSpec::default()).unwrap();
        assert!(out.equals(&df));
    }
}
