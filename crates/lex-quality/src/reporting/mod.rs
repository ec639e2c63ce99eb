//! Report generation module.
//!
//! Scoring results can be rendered in two shapes:
//!
//! - an HTML page ([`HtmlReportWriter`]) with a dataset overview, the
//!   detailed column × metric report and the per-metric quality summary
//! - a [`QualityReport`] for JSON output to stdout (`--json`) or to a file
//!   (`--emit-report`), with the score matrix also exportable as CSV
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_quality::reporting::{HtmlReportWriter, QualityReport, ReportGenerator};
//!
//! let writer = HtmlReportWriter::new(report_config.clone());
//! let page_path = writer.write(&primary, &scores)?;
//!
//! let report = QualityReport::build(
//!     "data/orders.csv",
//!     "data/orders_ref.csv",
//!     &primary,
//!     &reference,
//!     &scores,
//!     &report_config,
//! );
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! ReportGenerator::from_config(&report_config).write_report_to_file(&report)?;
//! ```

mod detailed;
mod json;
mod page;
mod summary;

pub use detailed::render_detailed_report;
pub use json::{MetricAverage, QualityReport, ReportGenerator};
pub use page::{ColumnOverview, DatasetOverview, HtmlReportWriter, render_overview};
pub use summary::{MetricSummary, render_quality_summary, summarize};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict on the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Good,
    NeedsImprovement,
}

impl QualityLevel {
    /// `Good` when `overall_score` reaches `good_mark`.
    pub fn from_score(overall_score: f64, good_mark: f64) -> Self {
        if overall_score >= good_mark {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Sentence shown under the detailed score table.
    pub fn note(&self, good_mark: f64) -> String {
        match self {
            Self::Good => format!(
                "NOTE: The overall data quality is considered good as it is at or above {:.0}%.",
                good_mark
            ),
            Self::NeedsImprovement => format!(
                "The overall data quality is below {:.0}%, indicating potential issues.",
                good_mark
            ),
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// Escape text for use in HTML element content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_quality_level_boundary() {
        assert_eq!(QualityLevel::from_score(80.0, 80.0), QualityLevel::Good);
        assert_eq!(
            QualityLevel::from_score(79.99, 80.0),
            QualityLevel::NeedsImprovement
        );
        assert_eq!(
            serde_json::to_string(&QualityLevel::NeedsImprovement).unwrap(),
            "\"needs_improvement\""
        );
    }
}
