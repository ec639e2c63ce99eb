//! CSV dataset loading.
//!
//! Datasets are read with polars' CSV reader. Loading falls back through
//! progressively more forgiving strategies, and column names are stripped
//! of surrounding whitespace once loaded.

use crate::error::{QualityError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows used for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a CSV file into a DataFrame.
///
/// Strategies, in order:
/// 1. standard parsing with `"` quoting
/// 2. parsing that skips malformed rows
/// 3. parsing of pre-cleaned content (collapsed quotes, blank lines removed)
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(QualityError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());
    let df = read_with_fallbacks(path)?;
    let df = strip_column_names(df)?;
    info!("Dataset loaded: {:?}", df.shape());
    Ok(df)
}

/// Parse CSV text into a DataFrame, with column names stripped.
pub fn load_dataset_from_str(content: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(content.to_string()))
        .finish()?;
    strip_column_names(df)
}

fn read_with_fallbacks(path: &Path) -> Result<DataFrame> {
    let path_buf = PathBuf::from(path);

    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path_buf.clone()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: skip rows that do not parse
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_ignore_errors(true)
        .try_into_reader_with_file_path(Some(path_buf))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading with ignored errors failed: {}", e),
    }

    // Strategy 3: pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cleaned = clean_csv_content(&content);
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .context(format!("Failed to parse CSV file {}", path.display()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip surrounding whitespace from every column name.
pub fn strip_column_names(mut df: DataFrame) -> Result<DataFrame> {
    let stripped: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(stripped)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_column_names() {
        let df = load_dataset_from_str(" id ,name  ,\temail\n1,a,a@x.io\n").unwrap();
        let names: Vec<_> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn test_infers_types() {
        let df = load_dataset_from_str("id,price,city\n1,2.5,oslo\n2,,rome\n").unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("price").unwrap().null_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset("does/not/exist.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n1,\"\"x\"\"\n"), "a,b\n1,\"x\"");
    }
}
