//! Machine-readable reports.

use super::{MetricSummary, QualityLevel, summarize};
use crate::config::ReportConfig;
use crate::error::{QualityError, Result};
use crate::metrics::Metric;
use crate::scoring::{QualityScores, ScoreMatrix};
use chrono::{Local, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Report of one scoring run, for `--json` and `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the scored dataset
    pub input_file: String,
    /// Path to the reference dataset
    pub reference_file: String,
    /// (rows, columns) of the scored dataset
    pub primary_shape: (usize, usize),
    /// (rows, columns) of the reference dataset
    pub reference_shape: (usize, usize),
    /// Timeliness threshold used by the run
    pub reference_time: NaiveDateTime,

    // Scores
    pub overall_score: f64,
    pub quality_level: QualityLevel,
    pub metric_averages: Vec<MetricAverage>,
    pub metric_summaries: Vec<MetricSummary>,
    pub scores: ScoreMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricAverage {
    pub metric: Metric,
    pub average: f64,
}

impl QualityReport {
    pub fn build(
        input_file: &str,
        reference_file: &str,
        primary: &DataFrame,
        reference: &DataFrame,
        scores: &QualityScores,
        config: &ReportConfig,
    ) -> Self {
        let metric_averages = scores
            .matrix
            .metric_averages()
            .into_iter()
            .map(|(metric, average)| MetricAverage { metric, average })
            .collect();

        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            reference_file: reference_file.to_string(),
            primary_shape: primary.shape(),
            reference_shape: reference.shape(),
            reference_time: scores.reference_time,
            overall_score: scores.overall_score,
            quality_level: QualityLevel::from_score(scores.overall_score, config.good_quality_mark),
            metric_averages,
            metric_summaries: summarize(&scores.matrix, config.pass_mark),
            scores: scores.matrix.clone(),
        }
    }
}

/// Writes JSON reports and score tables to the output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: String,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, output_name: impl Into<String>) -> Self {
        Self {
            output_dir,
            output_name: output_name.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.output_dir.clone(), config.output_name.clone())
    }

    /// Write `report` as pretty JSON to `<output_name>_report.json`.
    pub fn write_report_to_file(&self, report: &QualityReport) -> Result<PathBuf> {
        self.ensure_output_dir()?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", self.output_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the score matrix as CSV to `<output_name>_scores.csv`.
    pub fn write_scores_csv(&self, matrix: &ScoreMatrix) -> Result<PathBuf> {
        self.ensure_output_dir()?;

        let mut df = matrix.to_dataframe()?;
        let csv_path = self
            .output_dir
            .join(format!("{}_scores.csv", self.output_name));
        let mut file = File::create(&csv_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        info!("Scores saved: {}", csv_path.display());
        Ok(csv_path)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            QualityError::ReportGenerationFailed(format!(
                "cannot create {}: {}",
                self.output_dir.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ColumnScores, MetricScores};
    use chrono::NaiveDate;

    fn scores() -> QualityScores {
        let row = MetricScores {
            completeness: 100.0,
            timeliness: 100.0,
            validity: 50.0,
            accuracy: 75.0,
            uniqueness: 100.0,
            consistency: 75.0,
        };
        let matrix = ScoreMatrix::new(vec![ColumnScores {
            column: "email".to_string(),
            scores: row,
        }]);
        QualityScores {
            overall_score: matrix.overall_score(),
            matrix,
            reference_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lex-quality-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_build_report() {
        let df = df!("email" => ["a@x.io"]).unwrap();
        let report = QualityReport::build(
            "in.csv",
            "ref.csv",
            &df,
            &df,
            &scores(),
            &ReportConfig::default(),
        );

        assert_eq!(report.primary_shape, (1, 1));
        assert!((report.overall_score - 500.0 / 6.0).abs() < 1e-9);
        assert_eq!(report.quality_level, QualityLevel::Good);
        assert_eq!(report.metric_averages.len(), 6);
        assert_eq!(report.metric_averages[2].metric, Metric::Validity);
        assert_eq!(report.metric_averages[2].average, 50.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["quality_level"], "good");
        assert_eq!(json["scores"]["rows"][0]["scores"]["Validity"], 50.0);
    }

    #[test]
    fn test_write_report_and_csv() {
        let dir = temp_dir("json");
        let generator = ReportGenerator::new(dir.clone(), "orders");
        let df = df!("email" => ["a@x.io"]).unwrap();
        let report = QualityReport::build(
            "in.csv",
            "ref.csv",
            &df,
            &df,
            &scores(),
            &ReportConfig::default(),
        );

        let report_path = generator.write_report_to_file(&report).unwrap();
        assert_eq!(report_path, dir.join("orders_report.json"));
        let parsed: QualityReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(parsed.scores, report.scores);

        let csv_path = generator.write_scores_csv(&report.scores).unwrap();
        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with(
            "column,Completeness,Timeliness,Validity,Accuracy,Uniqueness,Consistency"
        ));
        assert!(csv.contains("email,"));

        let _ = fs::remove_dir_all(&dir);
    }
}
