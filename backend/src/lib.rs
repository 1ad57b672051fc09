//! # Ridership - station-level rail ridership ETL
//!
//! Cleans the raw ridership export and produces the two files the dashboard
//! reads: the processed dataset and the public holiday calendar.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│ Processed   │
//! │  (Latin-1)  │     │ (csv+decode)│     │ text/nulls/ │     │    CSV      │
//! └─────────────┘     └─────────────┘     │   dates     │     └─────────────┘
//!                                         └─────────────┘
//! ┌─────────────┐     ┌─────────────┐                         ┌─────────────┐
//! │  Holiday    │────▶│  Ordinal    │────────────────────────▶│  Holiday    │
//! │  source     │     │  suffixes   │                         │    CSV      │
//! └─────────────┘     └─────────────┘                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ridership::{run, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = run(&RunOptions::default())?;
//!     println!("{} rows, {} holidays", summary.output_rows, summary.holiday_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Diagnostic log broadcaster
//! - [`models`] - Dataset and holiday entry
//! - [`parser`] - CSV reading with encoding handling
//! - [`transform`] - Text, null and date stages plus the pipeline
//! - [`holidays`] - Holiday sources and name deduplication
//! - [`validation`] - Output schema validation
//! - [`output`] - CSV writers

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Holidays
pub mod holidays;

// Validation
pub mod validation;

// Persistence
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError,
    TransformError,
    HolidayError,
    ValidationError,
    PipelineError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{columns, Dataset, HolidayEntry, Record};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    parse_bytes,
    parse_csv_file,
    parse_str,
    detect_encoding,
    detect_delimiter,
    decode_content,
    ParseResult,
    ReadOptions,
};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use transform::{
    analyze_nulls,
    derive_date_features,
    drop_invalid_rows,
    remove_words,
    text_processing,
    week_of_month,
    DateFeatures,
    LineNullReport,
    NormalizerTables,
    TextNormalizer,
};

// =============================================================================
// Re-exports - Holidays
// =============================================================================

pub use holidays::{
    add_ordinal_suffix,
    generate_holidays,
    holiday_calendar,
    BuiltinCalendar,
    HolidaySource,
    JsonFileSource,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    clean_dataset,
    load_dataset,
    process_dataset,
    run,
    run_dataset,
    run_holidays,
    CsvInfo,
    RunOptions,
    RunSummary,
};

// =============================================================================
// Re-exports - Validation & Output
// =============================================================================

pub use validation::{
    validate_holiday_calendar,
    validate_processed_dataset,
    validate_processed_record,
};

pub use output::{write_dataset_csv, write_holidays_csv};
