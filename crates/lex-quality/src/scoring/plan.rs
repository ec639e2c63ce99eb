//! Per-metric applicability.
//!
//! Not every metric is computed for every column: Validity only runs for
//! e-mail-like columns and Timeliness only for datetime columns. A
//! [`MetricPlan`] records that decision once, so the aggregation loop only
//! has to evaluate plans.

use crate::error::Result;
use crate::metrics::{
    EmailValidator, Metric, accuracy_score, completeness_score, consistency_score,
    timeliness_score, uniqueness_score, validity_score,
};
use crate::utils::is_datetime_dtype;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Score given to a metric that does not apply to a column.
pub const NOT_APPLICABLE_SCORE: f64 = 100.0;

/// Column-name fragment that turns on e-mail validation.
const EMAIL_MARKER: &str = "email";

/// Settings resolved once per scoring run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanContext {
    pub reference_time: NaiveDateTime,
    pub accuracy_tolerance: Option<f64>,
}

/// A calculator invocation with its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricTask {
    Completeness,
    Timeliness { threshold: NaiveDateTime },
    EmailValidity,
    Accuracy { tolerance: Option<f64> },
    Uniqueness,
    Consistency,
}

/// Whether a metric is computed for a column, and how.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricPlan {
    Applicable(MetricTask),
    NotApplicable { fixed_score: f64 },
}

impl MetricPlan {
    /// Decide how `metric` is scored for `column`.
    pub fn for_column(metric: Metric, column: &Series, context: &PlanContext) -> Self {
        let task = match metric {
            Metric::Completeness => MetricTask::Completeness,
            Metric::Uniqueness => MetricTask::Uniqueness,
            Metric::Consistency => MetricTask::Consistency,
            Metric::Accuracy => MetricTask::Accuracy {
                tolerance: context.accuracy_tolerance,
            },
            Metric::Timeliness if is_datetime_dtype(column.dtype()) => MetricTask::Timeliness {
                threshold: context.reference_time,
            },
            Metric::Validity if is_email_column(column.name()) => MetricTask::EmailValidity,
            Metric::Timeliness | Metric::Validity => {
                return Self::NotApplicable {
                    fixed_score: NOT_APPLICABLE_SCORE,
                };
            }
        };
        Self::Applicable(task)
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Applicable(_))
    }

    /// Compute the score for `column`, a column of `primary`.
    pub fn evaluate(
        &self,
        primary: &DataFrame,
        reference: &DataFrame,
        column: &Series,
    ) -> Result<f64> {
        let task = match self {
            Self::NotApplicable { fixed_score } => return Ok(*fixed_score),
            Self::Applicable(task) => task,
        };

        match *task {
            MetricTask::Completeness => completeness_score(column),
            MetricTask::Uniqueness => uniqueness_score(column),
            MetricTask::EmailValidity => validity_score(column, Some(&EmailValidator)),
            MetricTask::Timeliness { threshold } => timeliness_score(column, Some(threshold)),
            MetricTask::Accuracy { tolerance } => {
                accuracy_score(primary, reference, column.name(), tolerance)
            }
            MetricTask::Consistency => consistency_score(primary, reference, column.name(), None),
        }
    }
}

/// Case-insensitive check for "email" anywhere in the column name.
fn is_email_column(name: &str) -> bool {
    name.to_lowercase().contains(EMAIL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn context() -> PlanContext {
        PlanContext {
            reference_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            accuracy_tolerance: Some(0.5),
        }
    }

    #[test]
    fn test_validity_gated_on_column_name() {
        let ctx = context();
        let email = Series::new("Work_EMAIL".into(), &["a@b.io"]);
        let name = Series::new("name".into(), &["a@b.io"]);

        assert_eq!(
            MetricPlan::for_column(Metric::Validity, &email, &ctx),
            MetricPlan::Applicable(MetricTask::EmailValidity)
        );
        assert_eq!(
            MetricPlan::for_column(Metric::Validity, &name, &ctx),
            MetricPlan::NotApplicable { fixed_score: 100.0 }
        );
    }

    #[test]
    fn test_timeliness_gated_on_dtype() {
        let ctx = context();
        let dates = Series::new("d".into(), &[1i32])
            .cast(&DataType::Date)
            .unwrap();
        let numbers = Series::new("n".into(), &[1i32]);

        assert_eq!(
            MetricPlan::for_column(Metric::Timeliness, &dates, &ctx),
            MetricPlan::Applicable(MetricTask::Timeliness {
                threshold: ctx.reference_time
            })
        );
        assert!(!MetricPlan::for_column(Metric::Timeliness, &numbers, &ctx).is_applicable());
    }

    #[test]
    fn test_accuracy_carries_tolerance() {
        let ctx = context();
        let numbers = Series::new("n".into(), &[1i32]);
        assert_eq!(
            MetricPlan::for_column(Metric::Accuracy, &numbers, &ctx),
            MetricPlan::Applicable(MetricTask::Accuracy {
                tolerance: Some(0.5)
            })
        );
    }

    #[test]
    fn test_not_applicable_skips_calculator() {
        let primary = df!("name" => ["", " "]).unwrap();
        let reference = df!("other" => [1]).unwrap();
        let column = primary.column("name").unwrap().as_materialized_series();

        let plan = MetricPlan::NotApplicable { fixed_score: 100.0 };
        assert_eq!(plan.evaluate(&primary, &reference, column).unwrap(), 100.0);
    }
}
