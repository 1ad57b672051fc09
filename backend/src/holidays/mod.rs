//! Public holiday calendar generation.
//!
//! A [`HolidaySource`] supplies `date -> name` for a country and a set of
//! years. [`generate_holidays`] turns that into date-ordered
//! [`HolidayEntry`] rows and [`add_ordinal_suffix`] makes repeated names of
//! multi-day holidays unique:
//!
//! ```text
//! 2022-05-02  Ramadan Feast          2022-05-02  Ramadan Feast
//! 2022-05-03  Ramadan Feast     →    2022-05-03  Ramadan Feast 2. Day
//! 2022-05-04  Ramadan Feast          2022-05-04  Ramadan Feast 3. Day
//! ```

pub mod file;
pub mod turkey;

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::error::HolidayResult;
use crate::logs::{log_info, log_success};
use crate::models::HolidayEntry;

pub use file::JsonFileSource;
pub use turkey::BuiltinCalendar;

/// Separator used when two holidays fall on the same date.
pub const SAME_DAY_SEPARATOR: &str = "; ";

/// Provider of public holidays.
pub trait HolidaySource {
    /// Holidays of `country` in `years`, keyed by date.
    fn holidays(&self, country: &str, years: &[i32]) -> HolidayResult<BTreeMap<NaiveDate, String>>;
}

/// Insert a holiday, joining names that share a date.
pub(crate) fn insert_holiday(map: &mut BTreeMap<NaiveDate, String>, date: NaiveDate, name: &str) {
    map.entry(date)
        .and_modify(|existing| {
            if !existing.split(SAME_DAY_SEPARATOR).any(|n| n == name) {
                existing.push_str(SAME_DAY_SEPARATOR);
                existing.push_str(name);
            }
        })
        .or_insert_with(|| name.to_string());
}

/// Every public holiday of `country` in `year`, sorted by date.
pub fn generate_holidays(
    source: &dyn HolidaySource,
    country: &str,
    year: i32,
) -> HolidayResult<Vec<HolidayEntry>> {
    let holidays = source.holidays(country, &[year])?;

    Ok(holidays
        .into_iter()
        .filter(|(date, _)| chrono::Datelike::year(date) == year)
        .map(|(date, name)| HolidayEntry::new(date, name))
        .collect())
}

/// Suffix the k-th (k >= 2) occurrence of each name with `" {k}. Day"`.
///
/// Names are counted in the given order; the first occurrence is unchanged.
pub fn add_ordinal_suffix<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{} {}. Day", name, count)
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Generate the calendar for `year` and deduplicate its names.
pub fn holiday_calendar(
    source: &dyn HolidaySource,
    country: &str,
    year: i32,
) -> HolidayResult<Vec<HolidayEntry>> {
    log_info(format!("🗓️  Generating {} holidays for {}...", country, year));

    let entries = generate_holidays(source, country, year)?;
    let names: Vec<&str> = entries.iter().map(|e| e.holiday_name.as_str()).collect();
    let unique = add_ordinal_suffix(&names);

    let renamed = names
        .iter()
        .zip(&unique)
        .filter(|(before, after)| **before != after.as_str())
        .count();

    let calendar: Vec<HolidayEntry> = entries
        .into_iter()
        .zip(unique)
        .map(|(entry, name)| HolidayEntry::new(entry.date, name))
        .collect();

    log_success(format!(
        "{} holidays, {} repeated names numbered",
        calendar.len(),
        renamed
    ));
    Ok(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HolidayError;

    struct FixedSource(Vec<(NaiveDate, &'static str)>);

    impl HolidaySource for FixedSource {
        fn holidays(&self, _country: &str, _years: &[i32]) -> HolidayResult<BTreeMap<NaiveDate, String>> {
            let mut map = BTreeMap::new();
            for (date, name) in &self.0 {
                insert_holiday(&mut map, *date, name);
            }
            Ok(map)
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_ordinal_suffix() {
        let names = ["Eid", "Eid", "NewYear", "Eid"];
        assert_eq!(
            add_ordinal_suffix(&names),
            vec!["Eid", "Eid 2. Day", "NewYear", "Eid 3. Day"]
        );
    }

    #[test]
    fn test_add_ordinal_suffix_single_occurrence() {
        assert_eq!(add_ordinal_suffix(&["New Year's Day"]), vec!["New Year's Day"]);
        assert!(add_ordinal_suffix::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_add_ordinal_suffix_counts_per_call() {
        let names = ["Eid", "Eid"];
        assert_eq!(add_ordinal_suffix(&names), add_ordinal_suffix(&names));
    }

    #[test]
    fn test_generate_sorts_by_date() {
        let source = FixedSource(vec![
            (d(2022, 10, 29), "Republic Day"),
            (d(2022, 1, 1), "New Year's Day"),
            (d(2023, 1, 1), "New Year's Day"),
        ]);

        let entries = generate_holidays(&source, "TR", 2022).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, d(2022, 1, 1));
        assert_eq!(entries[1].holiday_name, "Republic Day");
    }

    #[test]
    fn test_holiday_calendar_dedup() {
        let source = FixedSource(vec![
            (d(2022, 5, 4), "Ramadan Feast"),
            (d(2022, 5, 2), "Ramadan Feast"),
            (d(2022, 5, 3), "Ramadan Feast"),
            (d(2022, 1, 1), "New Year's Day"),
        ]);

        let calendar = holiday_calendar(&source, "TR", 2022).unwrap();
        let names: Vec<&str> = calendar.iter().map(|e| e.holiday_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["New Year's Day", "Ramadan Feast", "Ramadan Feast 2. Day", "Ramadan Feast 3. Day"]
        );
        assert_eq!(calendar[1].date, d(2022, 5, 2));
        assert_eq!(calendar[3].date, d(2022, 5, 4));
    }

    #[test]
    fn test_same_day_names_joined() {
        let mut map = BTreeMap::new();
        insert_holiday(&mut map, d(2022, 5, 1), "Labour and Solidarity Day");
        insert_holiday(&mut map, d(2022, 5, 1), "Ramadan Feast Eve");
        insert_holiday(&mut map, d(2022, 5, 1), "Ramadan Feast Eve");
        assert_eq!(map[&d(2022, 5, 1)], "Labour and Solidarity Day; Ramadan Feast Eve");
    }

    #[test]
    fn test_source_error_propagates() {
        let err = holiday_calendar(&BuiltinCalendar, "XX", 2022).unwrap_err();
        assert!(matches!(err, HolidayError::UnsupportedCountry(c) if c == "XX"));
    }
}
