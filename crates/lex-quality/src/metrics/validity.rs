use super::percentage;
use crate::error::Result;
use crate::utils::{
    ColumnKind, comparable_series, is_missing, render_value, series_kind, string_value,
};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid regex: email")
});

/// A predicate deciding whether a single cell is valid.
///
/// Any `Fn(&AnyValue<'_>) -> bool` implements this trait, so ad-hoc rules
/// can be passed as plain functions.
pub trait Validator: Send + Sync {
    /// Check one cell.
    fn is_valid(&self, value: &AnyValue<'_>) -> bool;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validator for F
where
    F: Fn(&AnyValue<'_>) -> bool + Send + Sync,
{
    fn is_valid(&self, value: &AnyValue<'_>) -> bool {
        self(value)
    }
}

/// Validation rule picked from the column kind when none is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValidator {
    /// Numeric and datetime columns: any present value is valid.
    NotMissing,
    /// Everything else: the value must be a string that is not blank.
    NonBlankText,
}

impl DefaultValidator {
    pub fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Numeric | ColumnKind::Datetime => Self::NotMissing,
            ColumnKind::Text | ColumnKind::Other => Self::NonBlankText,
        }
    }
}

impl Validator for DefaultValidator {
    fn is_valid(&self, value: &AnyValue<'_>) -> bool {
        match self {
            Self::NotMissing => !is_missing(value),
            Self::NonBlankText => string_value(value).is_some_and(|s| !s.trim().is_empty()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::NotMissing => "not_missing",
            Self::NonBlankText => "non_blank_text",
        }
    }
}

/// Accepts cells whose text looks like an e-mail address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn is_valid(&self, value: &AnyValue<'_>) -> bool {
        !is_missing(value) && EMAIL_PATTERN.is_match(&render_value(value))
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// Percentage of cells accepted by `validator`.
///
/// Without a validator the rule is chosen by [`DefaultValidator::for_kind`].
/// Categorical cells are validated by their string value. An empty column
/// scores `0.0`.
pub fn validity_score(column: &Series, validator: Option<&dyn Validator>) -> Result<f64> {
    let total = column.len();
    if total == 0 {
        return Ok(0.0);
    }

    let fallback = DefaultValidator::for_kind(series_kind(column));
    let validator = validator.unwrap_or(&fallback);
    let column = comparable_series(column)?;

    let mut valid = 0usize;
    for idx in 0..total {
        if validator.is_valid(&column.get(idx)?) {
            valid += 1;
        }
    }

    debug!(
        column = %column.name(),
        validator = validator.name(),
        "{} of {} cells valid",
        valid,
        total
    );
    Ok(percentage(valid, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text_rule_trims_whitespace() {
        let series = Series::new("name".into(), &["  ", "", "x"]);
        let score = validity_score(&series, None).unwrap();
        assert!((score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_text_rule_rejects_nulls() {
        let series = Series::new("name".into(), &[Some("a"), None]);
        assert_eq!(validity_score(&series, None).unwrap(), 50.0);
    }

    #[test]
    fn test_default_numeric_rule() {
        let series = Series::new("age".into(), &[Some(1.0), None, Some(f64::NAN), Some(0.0)]);
        assert_eq!(validity_score(&series, None).unwrap(), 50.0);
    }

    #[test]
    fn test_email_validator() {
        let series = Series::new(
            "email".into(),
            &[
                Some("jane.doe@example.com"),
                Some("not-an-email"),
                Some("x@y.c"),
                None,
            ],
        );
        assert_eq!(validity_score(&series, Some(&EmailValidator)).unwrap(), 25.0);
    }

    #[test]
    fn test_function_validator() {
        fn at_most_ten(value: &AnyValue<'_>) -> bool {
            crate::utils::numeric_value(value).is_some_and(|n| n <= 10.0)
        }

        let series = Series::new("qty".into(), &[1, 5, 10, 20]);
        assert_eq!(validity_score(&series, Some(&at_most_ten)).unwrap(), 75.0);
    }

    #[test]
    fn test_validity_empty_column() {
        let series = Series::new_empty("empty".into(), &DataType::String);
        assert_eq!(validity_score(&series, None).unwrap(), 0.0);
    }

    #[test]
    fn test_validator_names() {
        fn any_value(_: &AnyValue<'_>) -> bool {
            true
        }

        assert_eq!(EmailValidator.name(), "email");
        assert_eq!(DefaultValidator::NotMissing.name(), "not_missing");
        assert_eq!(DefaultValidator::NonBlankText.name(), "non_blank_text");
        assert_eq!(Validator::name(&any_value), "custom");
    }

    #[test]
    fn test_default_validator_for_kind() {
        assert_eq!(
            DefaultValidator::for_kind(ColumnKind::Datetime),
            DefaultValidator::NotMissing
        );
        assert_eq!(
            DefaultValidator::for_kind(ColumnKind::Other),
            DefaultValidator::NonBlankText
        );
    }
}
