//! JSON Schema validation of the pipeline outputs.
//!
//! The dashboard reads both output files by column name, so their shape is
//! pinned by schemas embedded at compile time from `schemas/`:
//! - `processed-ridership-record.json` - one processed dataset row
//! - `holiday-entry.json` - one holiday calendar row
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use ridership::validation::validate_processed_record;
//!
//! let row = json!({
//!     "station_name": "Aksaray",
//!     "year": 2022, "month": "April", "day": 15,
//!     "date": "2022-04-15", "week": 15, "week_number": 3,
//!     "day_of_week": "Friday", "weekend_status": 0
//! });
//! assert!(validate_processed_record(&row).is_ok());
//! ```

use serde_json::Value;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::models::{Dataset, HolidayEntry};

/// Maximum number of failing records kept in a report.
pub const MAX_REPORTED_ERRORS: usize = 10;

const PROCESSED_RECORD_SCHEMA: &str = include_str!("../../schemas/processed-ridership-record.json");
const HOLIDAY_ENTRY_SCHEMA: &str = include_str!("../../schemas/holiday-entry.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with the error messages otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn load_schema(source: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(source).map_err(|e| ValidationError::InvalidSchema(e.to_string()))
}

fn compile(source: &str) -> Result<jsonschema::Validator, ValidationError> {
    let schema = load_schema(source)?;
    jsonschema::draft7::new(&schema).map_err(|e| ValidationError::InvalidSchema(e.to_string()))
}

/// Validate one processed dataset row.
pub fn validate_processed_record(data: &Value) -> Result<(), Vec<String>> {
    let schema = load_schema(PROCESSED_RECORD_SCHEMA).map_err(|e| vec![e.to_string()])?;
    validate(&schema, data)
}

fn schema_failure(errors: Vec<(usize, Vec<String>)>, count: usize) -> ValidationError {
    let first = errors
        .first()
        .map(|(i, errs)| format!("record {}: {}", i, errs.join(", ")))
        .unwrap_or_default();
    ValidationError::SchemaError { count, first, errors }
}

/// Validate every row of the processed dataset.
///
/// Returns the number of valid rows. At most [`MAX_REPORTED_ERRORS`] failing
/// rows are listed in the error.
pub fn validate_processed_dataset(dataset: &Dataset) -> Result<usize, ValidationError> {
    let validator = compile(PROCESSED_RECORD_SCHEMA)?;

    let mut invalid = 0;
    let mut errors = Vec::new();

    for (i, record) in dataset.records().iter().enumerate() {
        let value = Value::Object(record.clone());
        if validator.is_valid(&value) {
            continue;
        }
        invalid += 1;
        if errors.len() < MAX_REPORTED_ERRORS {
            errors.push((i, validator.iter_errors(&value).map(|e| e.to_string()).collect()));
        }
    }

    if invalid > 0 {
        return Err(schema_failure(errors, invalid));
    }
    Ok(dataset.len())
}

/// Validate the holiday calendar rows and the uniqueness of their names.
pub fn validate_holiday_calendar(entries: &[HolidayEntry]) -> Result<(), ValidationError> {
    let validator = compile(HOLIDAY_ENTRY_SCHEMA)?;

    let mut invalid = 0;
    let mut errors = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let value = serde_json::to_value(entry)
            .map_err(|e| ValidationError::InvalidSchema(e.to_string()))?;
        if validator.is_valid(&value) {
            continue;
        }
        invalid += 1;
        if errors.len() < MAX_REPORTED_ERRORS {
            errors.push((i, validator.iter_errors(&value).map(|e| e.to_string()).collect()));
        }
    }

    if invalid > 0 {
        return Err(schema_failure(errors, invalid));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.holiday_name.as_str()) {
            return Err(ValidationError::DuplicateHoliday(entry.holiday_name.clone()));
        }
    }

    Ok(())
}
