//! Holiday source backed by a JSON file of `{ "YYYY-MM-DD": "name" }`.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::{insert_holiday, HolidaySource};
use crate::error::{HolidayError, HolidayResult};

/// Reads holidays from a JSON object keyed by ISO date.
///
/// The file holds one country's holidays; the country code is not checked.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse a `{date: name}` document.
    pub fn parse(content: &str) -> HolidayResult<BTreeMap<NaiveDate, String>> {
        let raw: HashMap<String, String> = serde_json::from_str(content)?;

        let mut map = BTreeMap::new();
        for (date, name) in raw {
            let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| HolidayError::InvalidDate(date.clone()))?;
            insert_holiday(&mut map, parsed, name.trim());
        }
        Ok(map)
    }
}

impl HolidaySource for JsonFileSource {
    fn holidays(&self, _country: &str, years: &[i32]) -> HolidayResult<BTreeMap<NaiveDate, String>> {
        let content = fs::read_to_string(&self.path)?;
        let mut map = Self::parse(&content)?;
        map.retain(|date, _| years.contains(&date.year()));
        Ok(map)
    }
}
