//! Score aggregation.
//!
//! [`QualityScorer`] walks every column of the primary dataset, evaluates
//! the six metrics through their [`MetricPlan`], and collects the results
//! into a [`ScoreMatrix`] and an overall score.
//!
//! ```rust,ignore
//! use lex_quality::{QualityScorer, ScoringConfig};
//!
//! let scores = QualityScorer::new(ScoringConfig::default()).score(&primary, &reference)?;
//! println!("Overall: {:.2}%", scores.overall_score);
//! ```

mod matrix;
mod plan;

pub use matrix::{ColumnScores, MetricScores, ScoreMatrix};
pub use plan::{MetricPlan, MetricTask, NOT_APPLICABLE_SCORE, PlanContext};

use crate::config::ScoringConfig;
use crate::error::{QualityError, Result, ResultExt};
use crate::metrics::Metric;
use chrono::{Local, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// Per-column, per-metric scores.
    pub matrix: ScoreMatrix,
    /// Mean of every cell of the matrix.
    pub overall_score: f64,
    /// Timeliness threshold the run used.
    pub reference_time: NaiveDateTime,
}

/// Computes quality scores for a dataset against a reference dataset.
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: ScoringConfig,
}

static_assertions::assert_impl_all!(QualityScorer: Send, Sync);
static_assertions::assert_impl_all!(QualityScores: Send, Sync);

impl QualityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every column of `primary` against `reference`.
    ///
    /// The datasets are compared row by row, so they must have the same
    /// number of rows. Every run recomputes all scores; the first failing
    /// metric aborts the whole run.
    pub fn score(&self, primary: &DataFrame, reference: &DataFrame) -> Result<QualityScores> {
        if primary.height() != reference.height() {
            return Err(QualityError::Alignment {
                primary_rows: primary.height(),
                reference_rows: reference.height(),
            });
        }

        let context = PlanContext {
            reference_time: self.resolve_reference_time(),
            accuracy_tolerance: self.config.accuracy_tolerance,
        };

        info!(
            "Scoring {} columns x {} rows (threshold: {})",
            primary.width(),
            primary.height(),
            context.reference_time
        );

        let mut rows = Vec::with_capacity(primary.width());
        for column in primary.get_columns() {
            let series = column.as_materialized_series();
            rows.push(self.score_column(primary, reference, series, &context)?);
        }

        let matrix = ScoreMatrix::new(rows);
        let overall_score = matrix.overall_score();
        info!("Overall data quality score: {:.2}%", overall_score);

        Ok(QualityScores {
            matrix,
            overall_score,
            reference_time: context.reference_time,
        })
    }

    fn score_column(
        &self,
        primary: &DataFrame,
        reference: &DataFrame,
        series: &Series,
        context: &PlanContext,
    ) -> Result<ColumnScores> {
        let name = series.name().to_string();
        let mut scores = MetricScores::default();

        for metric in Metric::ALL {
            let plan = MetricPlan::for_column(metric, series, context);
            let score = plan
                .evaluate(primary, reference, series)
                .context(format!("Failed to score {} for column '{}'", metric, name))?;

            debug!(
                column = %name,
                metric = %metric,
                applicable = plan.is_applicable(),
                "score {:.2}",
                score
            );
            scores.set(metric, score);
        }

        Ok(ColumnScores {
            column: name,
            scores,
        })
    }

    fn resolve_reference_time(&self) -> NaiveDateTime {
        self.config.reference_time.unwrap_or_else(|| {
            let now = Local::now().naive_local();
            warn!("No reference time configured; using current time {}", now);
            now
        })
    }
}
