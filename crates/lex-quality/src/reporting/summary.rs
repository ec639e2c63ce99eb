//! Quality summary section: one card per metric.

use super::escape_html;
use crate::metrics::Metric;
use crate::scoring::ScoreMatrix;
use serde::{Deserialize, Serialize};

/// Pass statistics of one metric across all columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    /// Share of columns scoring at least the pass mark, in percent.
    pub passing_percentage: f64,
    pub passing_columns: Vec<String>,
}

/// Per-metric pass statistics in [`Metric::ALL`] order.
///
/// An empty matrix yields `0.0` passing for every metric.
pub fn summarize(matrix: &ScoreMatrix, pass_mark: f64) -> Vec<MetricSummary> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let passing_columns: Vec<String> = matrix
                .passing_columns(metric, pass_mark)
                .into_iter()
                .map(String::from)
                .collect();
            let passing_percentage = if matrix.is_empty() {
                0.0
            } else {
                passing_columns.len() as f64 / matrix.len() as f64 * 100.0
            };
            MetricSummary {
                metric,
                passing_percentage,
                passing_columns,
            }
        })
        .collect()
}

/// Render the quality summary HTML fragment.
pub fn render_quality_summary(matrix: &ScoreMatrix, pass_mark: f64) -> String {
    let mut html = String::from(
        "<div class='container'>\n<h1>Quality Summary Report</h1>\n<div class='metrics-container'>\n",
    );

    for summary in summarize(matrix, pass_mark) {
        html.push_str(&format!(
            "<div class='metric-card'>\n<div class='metric-title'>{}</div>\n<div class='passing-percentage'>{:.2}% Passing</div>\n",
            summary.metric, summary.passing_percentage
        ));

        if summary.passing_columns.is_empty() {
            html.push_str(&format!(
                "<p class='no-columns'>No columns are passing {:.0}% or above</p>\n",
                pass_mark
            ));
        } else {
            html.push_str("<ul class='columns-list'>\n");
            for column in &summary.passing_columns {
                html.push_str(&format!("<li>{}</li>\n", escape_html(column)));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("</div>\n");
    }

    html.push_str("</div>\n</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ColumnScores, MetricScores};
    use pretty_assertions::assert_eq;

    fn matrix() -> ScoreMatrix {
        let good = MetricScores {
            completeness: 100.0,
            timeliness: 100.0,
            validity: 100.0,
            accuracy: 90.0,
            uniqueness: 100.0,
            consistency: 85.0,
        };
        let poor = MetricScores {
            accuracy: 10.0,
            consistency: 79.9,
            ..good
        };
        ScoreMatrix::new(vec![
            ColumnScores {
                column: "id".to_string(),
                scores: good,
            },
            ColumnScores {
                column: "email".to_string(),
                scores: poor,
            },
        ])
    }

    #[test]
    fn test_summarize() {
        let summaries = summarize(&matrix(), 80.0);
        assert_eq!(summaries.len(), 6);

        let accuracy = &summaries[Metric::Accuracy.index()];
        assert_eq!(accuracy.metric, Metric::Accuracy);
        assert_eq!(accuracy.passing_percentage, 50.0);
        assert_eq!(accuracy.passing_columns, vec!["id".to_string()]);

        let completeness = &summaries[Metric::Completeness.index()];
        assert_eq!(completeness.passing_percentage, 100.0);
    }

    #[test]
    fn test_summarize_empty_matrix() {
        for summary in summarize(&ScoreMatrix::default(), 80.0) {
            assert_eq!(summary.passing_percentage, 0.0);
            assert!(summary.passing_columns.is_empty());
        }
    }

    #[test]
    fn test_render_cards() {
        let html = render_quality_summary(&matrix(), 80.0);
        assert_eq!(html.matches("class='metric-card'").count(), 6);
        assert!(html.contains("50.00% Passing"));
        assert!(html.contains("<li>email</li>"));

        let strict = render_quality_summary(&matrix(), 95.0);
        assert!(strict.contains("No columns are passing 95% or above"));
    }
}
