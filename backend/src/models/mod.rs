//! Domain models for the ridership pipeline.
//!
//! - [`Dataset`] - the in-memory ridership table (ordered columns, JSON cells)
//! - [`HolidayEntry`] - one row of the holiday calendar
//! - [`columns`] - column names shared by the stages and the dashboard
//!
//! Cells are `serde_json::Value`s. `Value::Null` is the one missing-value
//! marker: the parser produces it for empty cells and the text stage converts
//! stringified missing values back to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TransformError, TransformResult};

/// Column names of the raw and processed datasets.
pub mod columns {
    pub const LINE: &str = "line";
    pub const STATION_NAME: &str = "station_name";
    pub const TOWN: &str = "town";

    pub const TRANSACTION_YEAR: &str = "transaction_year";
    pub const TRANSACTION_MONTH: &str = "transaction_month";
    pub const TRANSACTION_DAY: &str = "transaction_day";

    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const DAY: &str = "day";
    pub const DATE: &str = "date";
    pub const WEEK: &str = "week";
    pub const WEEK_NUMBER: &str = "week_number";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const WEEKEND_STATUS: &str = "weekend_status";
}

/// One row of the dataset, keyed by column name.
pub type Record = Map<String, Value>;

// =============================================================================
// Dataset
// =============================================================================

/// Ridership table: ordered headers plus one [`Record`] per row.
///
/// Every record holds a value (possibly `Null`) for every header. Stages take
/// a `Dataset` by value and hand back the transformed table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset; cells missing from a record are filled with `Null`.
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                for header in &headers {
                    if !record.contains_key(header) {
                        record.insert(header.clone(), Value::Null);
                    }
                }
                record
            })
            .collect();
        Self { headers, records }
    }

    /// Build a dataset from JSON objects; non-object values are ignored.
    pub fn from_values(headers: Vec<String>, values: Vec<Value>) -> Self {
        let records = values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .collect();
        Self::new(headers, records)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.headers.len())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Fail with [`TransformError::MissingColumn`] unless `name` exists.
    pub fn require_column(&self, name: &str) -> TransformResult<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(TransformError::MissingColumn(name.to_string()))
        }
    }

    /// Rename columns in place, keeping their position.
    ///
    /// Renaming onto an existing column replaces it.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for (from, to) in renames {
            if from == to || !self.has_column(from) {
                continue;
            }
            if let Some(existing) = self.headers.iter().position(|h| h == to) {
                self.headers.remove(existing);
                for record in &mut self.records {
                    record.remove(*to);
                }
            }
            let Some(pos) = self.headers.iter().position(|h| h == from) else {
                continue;
            };
            self.headers[pos] = to.to_string();
            for record in &mut self.records {
                let value = record.remove(*from).unwrap_or(Value::Null);
                record.insert(to.to_string(), value);
            }
        }
    }

    /// Append a column header if absent. New cells start as `Null`.
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.headers.push(name.to_string());
        for record in &mut self.records {
            record.insert(name.to_string(), Value::Null);
        }
    }

    /// Keep only records matching `keep`, preserving order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Record) -> bool,
    {
        self.records.retain(keep);
    }

    /// Values of one column in row order (`Null` when absent).
    pub fn column(&self, name: &str) -> impl Iterator<Item = &Value> + '_ {
        let name = name.to_string();
        self.records
            .iter()
            .map(move |r| r.get(&name).unwrap_or(&Value::Null))
    }

    /// Values of one row in header order.
    pub fn row_values<'a>(&'a self, record: &'a Record) -> impl Iterator<Item = &'a Value> + 'a {
        self.headers
            .iter()
            .map(move |h| record.get(h).unwrap_or(&Value::Null))
    }
}

/// Short type name of a JSON value, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Holiday Entry
// =============================================================================

/// One row of the holiday calendar, serialized as `Date,Holiday`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Holiday")]
    pub holiday_name: String,
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, holiday_name: impl Into<String>) -> Self {
        Self {
            date,
            holiday_name: holiday_name.into(),
        }
    }
}
