//! Batch pipeline: raw ridership CSV to the two dashboard files.
//!
//! ```text
//! raw CSV ─▶ text_processing ─▶ drop_invalid_rows ─▶ derive_date_features ─▶ processed CSV
//! holiday source ─▶ generate_holidays ─▶ add_ordinal_suffix ─────────────────▶ holiday CSV
//! ```
//!
//! Outputs are written only once every stage, including validation, has
//! succeeded.
//!
//! # Example
//!
//! ```rust,ignore
//! use ridership::{run, RunOptions};
//!
//! let summary = run(&RunOptions::default())?;
//! println!("Wrote {} rows", summary.output_rows);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::dates::derive_date_features;
use super::nulls::drop_invalid_rows;
use super::text::{text_processing, NormalizerTables, TextNormalizer};
use crate::error::{PipelineResult, TransformResult};
use crate::holidays::{holiday_calendar, BuiltinCalendar, HolidaySource, JsonFileSource};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{Dataset, HolidayEntry};
use crate::output::{
    commit_all, stage_dataset_csv, stage_holidays_csv, write_dataset_csv, write_holidays_csv,
};
use crate::parser::{parse_csv_file, ParseResult, ReadOptions};
use crate::validation::{validate_holiday_calendar, validate_processed_dataset};

/// Options for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Directory holding the input and receiving the outputs
    pub data_dir: PathBuf,

    /// Raw dataset file name inside `data_dir`
    pub input_file: String,

    /// Processed dataset file name inside `data_dir`
    pub processed_file: String,

    /// Holiday calendar file name inside `data_dir`
    pub holidays_file: String,

    /// Decoding and splitting of the raw file
    pub read: ReadOptions,

    /// Year of the holiday calendar
    pub holiday_year: i32,

    /// Country code passed to the holiday source
    pub country: String,

    /// `{date: name}` JSON file replacing the built-in calendar
    pub holiday_source: Option<PathBuf>,

    /// JSON file replacing the default normalizer tables
    pub tables_path: Option<PathBuf>,

    /// Skip output schema validation
    pub skip_validation: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_file: "2022_rail_systems_dataset.csv".to_string(),
            processed_file: "processed_data_2022_rail_stations.csv".to_string(),
            holidays_file: "tr_holidays.csv".to_string(),
            read: ReadOptions::default(),
            holiday_year: 2022,
            country: "TR".to_string(),
            holiday_source: None,
            tables_path: None,
            skip_validation: false,
        }
    }
}

impl RunOptions {
    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(&self.input_file)
    }

    pub fn processed_path(&self) -> PathBuf {
        self.data_dir.join(&self.processed_file)
    }

    pub fn holidays_path(&self) -> PathBuf {
        self.data_dir.join(&self.holidays_file)
    }

    /// Normalizer built from `tables_path`, or the default tables.
    pub fn normalizer(&self) -> PipelineResult<TextNormalizer> {
        let tables = match &self.tables_path {
            Some(path) => NormalizerTables::from_json(&fs::read_to_string(path)?)?,
            None => NormalizerTables::default(),
        };
        Ok(TextNormalizer::new(tables))
    }

    /// Holiday source: the JSON file if configured, else the built-in calendar.
    pub fn holiday_source(&self) -> Box<dyn HolidaySource> {
        match &self.holiday_source {
            Some(path) => Box::new(JsonFileSource::new(path)),
            None => Box::new(BuiltinCalendar),
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Raw file metadata (absent for holiday-only runs)
    pub csv_info: Option<CsvInfo>,
    /// Rows in the processed dataset
    pub output_rows: usize,
    /// Entries in the holiday calendar
    pub holiday_count: usize,
    /// Written processed dataset
    pub processed_path: Option<PathBuf>,
    /// Written holiday calendar
    pub holidays_path: Option<PathBuf>,
}

/// Drop rows without a station, then derive the date features.
///
/// Any invalid date fails the whole dataset.
pub fn process_dataset(dataset: Dataset) -> TransformResult<Dataset> {
    derive_date_features(drop_invalid_rows(dataset)?)
}

/// Text normalization followed by [`process_dataset`].
pub fn clean_dataset(dataset: Dataset, normalizer: &TextNormalizer) -> TransformResult<Dataset> {
    process_dataset(text_processing(dataset, normalizer)?)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Read the raw dataset at `path`.
pub fn load_dataset(path: &Path, read: &ReadOptions) -> PipelineResult<(Dataset, CsvInfo)> {
    log_info(format!("📖 Reading {}...", path.display()));
    let ParseResult {
        dataset,
        encoding,
        delimiter,
    } = parse_csv_file(path, read)?;

    let (rows, cols) = dataset.shape();
    log_success(format!("Encoding: {}", encoding));
    log_success(format!("Separator: '{}'", format_delimiter(delimiter)));
    log_success(format!("Read {} rows x {} columns", rows, cols));
    if dataset.is_empty() {
        log_warning("Header only, the outputs will have no rows");
    }

    let info = CsvInfo {
        encoding,
        delimiter,
        headers: dataset.headers().to_vec(),
        row_count: rows,
    };
    Ok((dataset, info))
}

fn build_dataset(options: &RunOptions) -> PipelineResult<(Dataset, CsvInfo)> {
    let normalizer = options.normalizer()?;
    let (raw, info) = load_dataset(&options.input_path(), &options.read)?;
    let processed = clean_dataset(raw, &normalizer)?;

    if !options.skip_validation {
        log_info("✔️  Validating processed records...");
        let valid = validate_processed_dataset(&processed)?;
        log_success(format!("All {} records valid", valid));
    }
    Ok((processed, info))
}

fn build_holidays(options: &RunOptions) -> PipelineResult<Vec<HolidayEntry>> {
    let source = options.holiday_source();
    let calendar = holiday_calendar(source.as_ref(), &options.country, options.holiday_year)?;

    if !options.skip_validation {
        validate_holiday_calendar(&calendar)?;
    }
    Ok(calendar)
}

/// Full batch: processed dataset and holiday calendar.
pub fn run(options: &RunOptions) -> PipelineResult<RunSummary> {
    let (processed, info) = build_dataset(options)?;
    let calendar = build_holidays(options)?;

    let processed_path = options.processed_path();
    let holidays_path = options.holidays_path();

    // Both files land together or not at all
    let staged = vec![
        stage_dataset_csv(&processed, &processed_path)?,
        stage_holidays_csv(&calendar, &holidays_path)?,
    ];
    commit_all(staged)?;
    log_success(format!("💾 Processed data saved to: {}", processed_path.display()));
    log_success(format!("💾 Holidays saved to: {}", holidays_path.display()));

    Ok(RunSummary {
        csv_info: Some(info),
        output_rows: processed.len(),
        holiday_count: calendar.len(),
        processed_path: Some(processed_path),
        holidays_path: Some(holidays_path),
    })
}

/// Processed dataset only.
pub fn run_dataset(options: &RunOptions) -> PipelineResult<RunSummary> {
    let (processed, info) = build_dataset(options)?;

    let processed_path = options.processed_path();
    write_dataset_csv(&processed, &processed_path)?;
    log_success(format!("💾 Processed data saved to: {}", processed_path.display()));

    Ok(RunSummary {
        csv_info: Some(info),
        output_rows: processed.len(),
        holiday_count: 0,
        processed_path: Some(processed_path),
        holidays_path: None,
    })
}

/// Holiday calendar only.
pub fn run_holidays(options: &RunOptions) -> PipelineResult<RunSummary> {
    let calendar = build_holidays(options)?;

    let holidays_path = options.holidays_path();
    write_holidays_csv(&calendar, &holidays_path)?;
    log_success(format!("💾 Holidays saved to: {}", holidays_path.display()));

    Ok(RunSummary {
        csv_info: None,
        output_rows: 0,
        holiday_count: calendar.len(),
        processed_path: None,
        holidays_path: Some(holidays_path),
    })
}
