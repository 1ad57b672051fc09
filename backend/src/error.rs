//! Error types for the ridership ETL pipeline.
//!
//! - [`CsvError`] - reading and decoding the raw dataset
//! - [`TransformError`] - text, null-filter and date stages
//! - [`HolidayError`] - holiday calendar sources
//! - [`ValidationError`] - output schema checks
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading the raw dataset.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported or unknown encoding label.
    #[error("Unsupported encoding: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors raised by the dataset stages.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column a stage depends on is absent.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell that must hold text holds something else.
    #[error("Row {row}, column '{column}': expected text, found {found}")]
    NotText {
        row: usize,
        column: String,
        found: &'static str,
    },

    /// A date component cannot be read as an integer.
    #[error("Row {row}, column '{column}': '{value}' is not an integer")]
    NotInteger {
        row: usize,
        column: String,
        value: String,
    },

    /// A year/month/day triple that is not a calendar date.
    #[error("Row {row}: {year}-{month}-{day} is not a valid calendar date")]
    InvalidDate {
        row: usize,
        year: i64,
        month: i64,
        day: i64,
    },
}

// =============================================================================
// Holiday Errors
// =============================================================================

/// Errors from holiday calendar sources.
#[derive(Debug, Error)]
pub enum HolidayError {
    /// The source has no calendar for this country.
    #[error("No holiday calendar for country '{0}'")]
    UnsupportedCountry(String),

    /// The source does not cover the requested year.
    #[error("Holiday calendar for '{country}' does not cover {year}")]
    UnsupportedYear { country: String, year: i32 },

    /// A holiday source file could not be read.
    #[error("Holiday source IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A holiday source file is not a `{date: name}` JSON object.
    #[error("Holiday source JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A date key in a holiday source file is not an ISO date.
    #[error("Invalid holiday date '{0}'")]
    InvalidDate(String),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from output schema validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The embedded schema itself failed to compile.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Records failed schema validation (record index, messages).
    #[error("{count} records failed validation, first: {first}")]
    SchemaError {
        count: usize,
        first: String,
        errors: Vec<(usize, Vec<String>)>,
    },

    /// The same holiday name appears more than once.
    #[error("Duplicate holiday name after deduplication: {0}")]
    DuplicateHoliday(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Dataset stage error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Holiday calendar error.
    #[error("Holiday error: {0}")]
    Holiday(#[from] HolidayError),

    /// Output validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Failed to write an output file.
    #[error("Output error: {0}")]
    Output(#[from] csv::Error),

    /// IO error outside CSV handling (config files, renames).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Normalizer table file is not valid JSON.
    #[error("Invalid normalizer tables: {0}")]
    Tables(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for dataset stages.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for holiday operations.
pub type HolidayResult<T> = Result<T, HolidayError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
