//! CLI entry point for data quality scoring.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use lex_quality::reporting::{HtmlReportWriter, QualityReport, ReportGenerator};
use lex_quality::{
    Metric, PreprocessSpec, QualityError, QualityScorer, ReportConfig, ScoringConfig,
    load_dataset, preprocess_dataset,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Data Quality Scoring",
    long_about = "Scores every column of a dataset on completeness, timeliness, validity,\n\
                  accuracy, uniqueness and consistency, comparing it row by row with a\n\
                  reference dataset, and writes an HTML quality report.\n\n\
                  EXAMPLES:\n  \
                  # Score against a reference snapshot\n  \
                  lex-quality -i data.csv --reference data_ref.csv\n\n  \
                  # Parse date columns and fix the timeliness threshold\n  \
                  lex-quality -i data.csv --reference data_ref.csv \\\n    \
                  --date-columns signup_date --reference-time 2024-01-01\n\n  \
                  # Machine-readable output\n  \
                  lex-quality -i data.csv --reference data_ref.csv --json"
)]
struct Args {
    /// Path to the CSV file to score
    #[arg(short, long)]
    input: String,

    /// Path to the reference CSV file (same row order as the input)
    #[arg(long)]
    reference: String,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Report file name (without extension)
    #[arg(long, default_value = "data_quality_report")]
    output_name: String,

    /// Timeliness threshold: YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"
    ///
    /// Defaults to the current local time
    #[arg(long, value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,

    /// Absolute tolerance for accuracy on numeric columns
    #[arg(long)]
    tolerance: Option<f64>,

    /// Columns to parse as dates (comma-separated)
    #[arg(long, value_delimiter = ',')]
    date_columns: Vec<String>,

    /// Date format for a column, as COLUMN=FORMAT (chrono syntax, repeatable)
    #[arg(long, value_parser = parse_date_format)]
    date_format: Vec<(String, String)>,

    /// Columns to convert to numbers (comma-separated)
    #[arg(long, value_delimiter = ',')]
    numeric_columns: Vec<String>,

    /// Columns to normalise as free text (comma-separated)
    #[arg(long, value_delimiter = ',')]
    text_columns: Vec<String>,

    /// Columns holding categories (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categorical_columns: Vec<String>,

    /// Score a column needs on a metric to count as passing
    #[arg(long, default_value = "80.0")]
    pass_mark: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <output_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the score matrix as <output_name>_scores.csv
    #[arg(long)]
    emit_csv: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only holds
/// the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_reference_time(value: &str) -> std::result::Result<NaiveDateTime, String> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("invalid reference time '{}'", value))
}

fn parse_date_format(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((column, format)) if !column.trim().is_empty() && !format.is_empty() => {
            Ok((column.trim().to_string(), format.to_string()))
        }
        _ => Err(format!("expected COLUMN=FORMAT, got '{}'", value)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Quality scoring failed: {}", e);
            if let Some(hint) = failure_hint(&e) {
                error!("{}", hint);
            }
            Err(e)
        }
    }
}

const ALIGNMENT_HINT: &str =
    "--reference must hold the same columns and rows, in the same order, as --input";

/// Extra advice for failures caused by the two datasets not lining up.
fn failure_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<QualityError>()
        .filter(|e| e.is_cross_dataset())
        .map(|_| ALIGNMENT_HINT)
}

fn run(args: &Args) -> Result<()> {
    let primary = load_dataset(&args.input)?;
    if primary.height() == 0 || primary.width() == 0 {
        return Err(QualityError::EmptyDataset(args.input.clone()).into());
    }
    let reference = load_dataset(&args.reference)?;

    let spec = preprocess_spec(args);
    let primary = preprocess_dataset(primary, &spec)?;
    let reference = preprocess_dataset(reference, &spec)?;

    let mut scoring = ScoringConfig::builder();
    if let Some(reference_time) = args.reference_time {
        scoring = scoring.reference_time(reference_time);
    }
    if let Some(tolerance) = args.tolerance {
        scoring = scoring.accuracy_tolerance(tolerance);
    }
    let scoring = scoring.build()?;

    let report_config = ReportConfig::builder()
        .output_dir(&args.output)
        .output_name(&args.output_name)
        .pass_mark(args.pass_mark)
        .build()?;

    info!("{}", "=".repeat(80));
    info!("Scoring data quality...");
    info!("{}", "=".repeat(80));

    let scores = QualityScorer::new(scoring).score(&primary, &reference)?;

    let html_path = HtmlReportWriter::new(report_config.clone()).write(&primary, &scores)?;

    let report = QualityReport::build(
        &args.input,
        &args.reference,
        &primary,
        &reference,
        &scores,
        &report_config,
    );

    let generator = ReportGenerator::from_config(&report_config);
    let mut extra_outputs = Vec::new();
    if args.emit_report {
        extra_outputs.push(generator.write_report_to_file(&report)?);
    }
    if args.emit_csv {
        extra_outputs.push(generator.write_scores_csv(&scores.matrix)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report, &html_path, &extra_outputs, report_config.pass_mark);
    Ok(())
}

fn preprocess_spec(args: &Args) -> PreprocessSpec {
    let date_formats: HashMap<String, String> = args.date_format.iter().cloned().collect();

    // a column given a format is parsed as a date even when not listed
    let mut date_columns = args.date_columns.clone();
    for column in date_formats.keys() {
        if !date_columns.contains(column) {
            date_columns.push(column.clone());
        }
    }

    PreprocessSpec {
        date_columns: trimmed(&date_columns),
        numeric_columns: trimmed(&args.numeric_columns),
        text_columns: trimmed(&args.text_columns),
        categorical_columns: trimmed(&args.categorical_columns),
        date_formats,
    }
}

fn trimmed(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Print a human-readable summary of the scoring run.
fn print_human_readable_summary(
    report: &QualityReport,
    html_path: &Path,
    extra_outputs: &[PathBuf],
    pass_mark: f64,
) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:     {} ({} rows x {} columns)",
        report.input_file, report.primary_shape.0, report.primary_shape.1
    );
    println!(
        "Reference: {} ({} rows x {} columns)",
        report.reference_file, report.reference_shape.0, report.reference_shape.1
    );
    println!("Timeliness threshold: {}", report.reference_time);
    println!();

    println!(
        "Overall Score: {:.2}% ({})",
        report.overall_score, report.quality_level
    );
    println!();

    println!("Metric Averages:");
    for average in &report.metric_averages {
        println!("  {:<14} {:>7.2}%", average.metric.name(), average.average);
    }
    println!();

    print!("{:<20}", "Column");
    for metric in Metric::ALL {
        print!(" {:>12}", metric.name());
    }
    println!();
    println!("{}", "-".repeat(20 + 13 * Metric::ALL.len()));
    for row in report.scores.rows() {
        print!("{:<20}", truncate_str(&row.column, 19));
        for value in row.scores.values() {
            print!(" {:>12.2}", value);
        }
        println!();
    }
    println!();

    println!("Passing columns (>= {:.0}%):", pass_mark);
    for summary in &report.metric_summaries {
        println!(
            "  {:<14} {:>6.2}% ({} of {})",
            summary.metric.name(),
            summary.passing_percentage,
            summary.passing_columns.len(),
            report.scores.len()
        );
    }
    println!();

    println!("HTML report: {}", html_path.display());
    for path in extra_outputs {
        println!("Written:     {}", path.display());
    }
    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
