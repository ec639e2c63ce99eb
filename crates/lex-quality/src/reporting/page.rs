//! Dataset overview and the assembled HTML document.

use super::{escape_html, render_detailed_report, render_quality_summary};
use crate::config::ReportConfig;
use crate::error::{QualityError, Result};
use crate::scoring::QualityScores;
use crate::utils::{count_missing, nan_as_null, series_kind};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Shape and per-column statistics of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    pub column_overviews: Vec<ColumnOverview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverview {
    pub name: String,
    pub dtype: String,
    pub kind: String,
    pub missing: usize,
    pub distinct: usize,
}

impl DatasetOverview {
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut column_overviews = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            column_overviews.push(ColumnOverview {
                name: series.name().to_string(),
                dtype: series.dtype().to_string(),
                kind: series_kind(series).as_str().to_string(),
                missing: count_missing(series)?,
                distinct: nan_as_null(series)?.n_unique()?,
            });
        }

        Ok(Self {
            rows: df.height(),
            columns: df.width(),
            total_missing: column_overviews.iter().map(|c| c.missing).sum(),
            column_overviews,
        })
    }

    /// Percentage of missing cells over the whole dataset.
    pub fn missing_percentage(&self) -> f64 {
        let cells = self.rows * self.columns;
        if cells == 0 {
            0.0
        } else {
            self.total_missing as f64 / cells as f64 * 100.0
        }
    }
}

/// Render the overview section HTML fragment.
pub fn render_overview(overview: &DatasetOverview) -> String {
    let mut html = String::from(
        "<div class='container'>\n<h2 class='section-title'>Dataset Overview</h2>\n",
    );
    html.push_str(&format!(
        "<table>\n<tr><th>Rows</th><td>{}</td></tr>\n<tr><th>Columns</th><td>{}</td></tr>\n<tr><th>Missing cells</th><td>{} ({:.2}%)</td></tr>\n</table>\n",
        overview.rows,
        overview.columns,
        overview.total_missing,
        overview.missing_percentage()
    ));

    html.push_str(
        "<h4>Columns</h4>\n<table>\n<tr><th>Column</th><th>Type</th><th>Kind</th><th>Missing</th><th>Distinct</th></tr>\n",
    );
    for column in &overview.column_overviews {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&column.name),
            escape_html(&column.dtype),
            column.kind,
            column.missing,
            column.distinct
        ));
    }
    html.push_str("</table>\n</div>\n");
    html
}

/// Assembles and writes the HTML quality report.
#[derive(Debug, Clone, Default)]
pub struct HtmlReportWriter {
    config: ReportConfig,
}

impl HtmlReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Path the report is written to: `<output_dir>/<output_name>.html`.
    pub fn output_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.html", self.config.output_name))
    }

    /// Render the full document for `df` and its scores.
    pub fn render(&self, df: &DataFrame, scores: &QualityScores) -> Result<String> {
        let overview = DatasetOverview::from_dataframe(df)?;
        let sections = [
            ("overview", "Overview", render_overview(&overview)),
            (
                "detailed-report",
                "Detailed Report",
                render_detailed_report(scores, &self.config),
            ),
            (
                "quality-summary",
                "Quality Summary",
                render_quality_summary(&scores.matrix, self.config.pass_mark),
            ),
        ];

        let title = escape_html(&self.config.title);
        let mut html = format!(
            "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n",
            title, title
        );

        html.push_str("<div class='navbar'>\n");
        for (id, label, _) in &sections {
            html.push_str(&format!(
                "<a href='#' onclick=\"showSection('{}'); return false;\">{}</a>\n",
                id, label
            ));
        }
        html.push_str("</div>\n");

        for (position, (id, _, content)) in sections.iter().enumerate() {
            let display = if position == 0 { "block" } else { "none" };
            html.push_str(&format!(
                "<div id='{}' class='section-content' style='display:{};'>\n{}</div>\n",
                id, display, content
            ));
        }

        html.push_str(SHOW_SECTION_SCRIPT);
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    /// Render and write the document, returning its path.
    pub fn write(&self, df: &DataFrame, scores: &QualityScores) -> Result<PathBuf> {
        let html = self.render(df, scores)?;

        fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            QualityError::ReportGenerationFailed(format!(
                "cannot create {}: {}",
                self.config.output_dir.display(),
                e
            ))
        })?;

        let path = self.output_path();
        fs::write(&path, html)?;
        info!("HTML report saved: {}", path.display());
        Ok(path)
    }
}

const SHOW_SECTION_SCRIPT: &str = r#"<script>
function showSection(sectionId) {
    document.querySelectorAll('.section-content').forEach(section => section.style.display = 'none');
    document.getElementById(sectionId).style.display = 'block';
}
</script>
"#;
