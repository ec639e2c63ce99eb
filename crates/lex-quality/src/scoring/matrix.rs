//! Column × metric score table.

use crate::metrics::Metric;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// The six metric scores of one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricScores {
    pub completeness: f64,
    pub timeliness: f64,
    pub validity: f64,
    pub accuracy: f64,
    pub uniqueness: f64,
    pub consistency: f64,
}

impl MetricScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Completeness => self.completeness,
            Metric::Timeliness => self.timeliness,
            Metric::Validity => self.validity,
            Metric::Accuracy => self.accuracy,
            Metric::Uniqueness => self.uniqueness,
            Metric::Consistency => self.consistency,
        }
    }

    pub(crate) fn set(&mut self, metric: Metric, score: f64) {
        let slot = match metric {
            Metric::Completeness => &mut self.completeness,
            Metric::Timeliness => &mut self.timeliness,
            Metric::Validity => &mut self.validity,
            Metric::Accuracy => &mut self.accuracy,
            Metric::Uniqueness => &mut self.uniqueness,
            Metric::Consistency => &mut self.consistency,
        };
        *slot = score;
    }

    /// Scores in [`Metric::ALL`] order.
    pub fn values(&self) -> [f64; 6] {
        Metric::ALL.map(|metric| self.get(metric))
    }

    /// Mean over the six metrics.
    pub fn mean(&self) -> f64 {
        self.values().iter().sum::<f64>() / Metric::ALL.len() as f64
    }
}

/// Scores of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScores {
    pub column: String,
    pub scores: MetricScores,
}

/// Column → metric → score table, in dataset column order.
///
/// Built once per scoring run and not modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    rows: Vec<ColumnScores>,
}

impl ScoreMatrix {
    pub fn new(rows: Vec<ColumnScores>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ColumnScores] {
        &self.rows
    }

    /// Column names in dataset order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.column.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores of one column.
    pub fn get(&self, column: &str) -> Option<&MetricScores> {
        self.rows
            .iter()
            .find(|row| row.column == column)
            .map(|row| &row.scores)
    }

    /// Score of one cell.
    pub fn score(&self, column: &str, metric: Metric) -> Option<f64> {
        self.get(column).map(|scores| scores.get(metric))
    }

    /// Mean of one metric across all columns. `None` for an empty matrix.
    pub fn metric_average(&self, metric: Metric) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let total: f64 = self.rows.iter().map(|row| row.scores.get(metric)).sum();
        Some(total / self.rows.len() as f64)
    }

    /// Per-metric means in [`Metric::ALL`] order.
    pub fn metric_averages(&self) -> Vec<(Metric, f64)> {
        Metric::ALL
            .iter()
            .filter_map(|&metric| self.metric_average(metric).map(|avg| (metric, avg)))
            .collect()
    }

    /// Overall quality score: the mean of the per-metric means.
    ///
    /// The matrix is rectangular, so this equals the mean over every cell.
    /// An empty matrix scores `0.0`.
    pub fn overall_score(&self) -> f64 {
        let averages = self.metric_averages();
        if averages.is_empty() {
            return 0.0;
        }
        averages.iter().map(|(_, avg)| avg).sum::<f64>() / averages.len() as f64
    }

    /// Columns scoring at least `pass_mark` on `metric`.
    pub fn passing_columns(&self, metric: Metric, pass_mark: f64) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.scores.get(metric) >= pass_mark)
            .map(|row| row.column.as_str())
            .collect()
    }

    /// The matrix as a DataFrame: a `column` column followed by one column
    /// per metric.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = self.columns().collect();
        let mut columns = Vec::with_capacity(Metric::ALL.len() + 1);
        columns.push(Column::new("column".into(), names));

        for metric in Metric::ALL {
            let values: Vec<f64> = self.rows.iter().map(|row| row.scores.get(metric)).collect();
            columns.push(Column::new(metric.name().into(), values));
        }

        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(column: &str, values: [f64; 6]) -> ColumnScores {
        let mut scores = MetricScores::default();
        for (metric, value) in Metric::ALL.iter().zip(values) {
            scores.set(*metric, value);
        }
        ColumnScores {
            column: column.to_string(),
            scores,
        }
    }

    fn sample() -> ScoreMatrix {
        ScoreMatrix::new(vec![
            row("id", [100.0, 100.0, 100.0, 100.0, 100.0, 100.0]),
            row("email", [50.0, 100.0, 25.0, 75.0, 50.0, 60.0]),
        ])
    }

    #[test]
    fn test_overall_is_mean_of_cells() {
        let matrix = sample();
        let cells: Vec<f64> = matrix.rows().iter().flat_map(|r| r.scores.values()).collect();
        let flat_mean = cells.iter().sum::<f64>() / cells.len() as f64;
        assert!((matrix.overall_score() - flat_mean).abs() < 1e-9);
    }

    #[test]
    fn test_metric_average() {
        let matrix = sample();
        assert_eq!(matrix.metric_average(Metric::Validity), Some(62.5));
        assert_eq!(ScoreMatrix::default().metric_average(Metric::Validity), None);
    }

    #[test]
    fn test_empty_matrix_overall_score() {
        assert_eq!(ScoreMatrix::default().overall_score(), 0.0);
    }

    #[test]
    fn test_lookup_and_passing_columns() {
        let matrix = sample();
        assert_eq!(matrix.score("email", Metric::Accuracy), Some(75.0));
        assert_eq!(matrix.score("missing", Metric::Accuracy), None);
        assert_eq!(matrix.passing_columns(Metric::Accuracy, 80.0), vec!["id"]);
        assert_eq!(
            matrix.passing_columns(Metric::Timeliness, 80.0),
            vec!["id", "email"]
        );
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample().to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 7));
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec![
                "column",
                "Completeness",
                "Timeliness",
                "Validity",
                "Accuracy",
                "Uniqueness",
                "Consistency"
            ]
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&MetricScores::default()).unwrap();
        assert!(json.contains("\"Completeness\""));
        assert!(json.contains("\"Consistency\""));
    }
}
