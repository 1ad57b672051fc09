//! Built-in public holiday calendar for Turkey (`TR`).
//!
//! Fixed-date holidays follow Law No. 2429. The two religious feasts move with
//! the Hijri calendar, so their first days come from the Diyanet tables
//! below; years outside the table are rejected.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use super::{insert_holiday, HolidaySource};
use crate::error::{HolidayError, HolidayResult};

pub const COUNTRY_CODE: &str = "TR";

pub const RAMADAN_FEAST: &str = "Ramadan Feast";
pub const SACRIFICE_FEAST: &str = "Sacrifice Feast";

const RAMADAN_FEAST_DAYS: i64 = 3;
const SACRIFICE_FEAST_DAYS: i64 = 4;

/// (month, day, name, first year observed)
const FIXED_HOLIDAYS: &[(u32, u32, &str, i32)] = &[
    (1, 1, "New Year's Day", 1936),
    (4, 23, "National Sovereignty and Children's Day", 1936),
    (5, 1, "Labour and Solidarity Day", 2009),
    (5, 19, "Commemoration of Atatürk, Youth and Sports Day", 1936),
    (7, 15, "Democracy and National Unity Day", 2017),
    (8, 30, "Victory Day", 1936),
    (10, 29, "Republic Day", 1936),
];

/// First day of Ramadan Feast and Sacrifice Feast, (year, (month, day), (month, day)).
const FEAST_START: &[(i32, (u32, u32), (u32, u32))] = &[
    (2018, (6, 15), (8, 21)),
    (2019, (6, 4), (8, 11)),
    (2020, (5, 24), (7, 31)),
    (2021, (5, 13), (7, 20)),
    (2022, (5, 2), (7, 9)),
    (2023, (4, 21), (6, 28)),
    (2024, (4, 10), (6, 16)),
    (2025, (3, 30), (6, 6)),
    (2026, (3, 20), (5, 27)),
    (2027, (3, 9), (5, 16)),
    (2028, (2, 26), (5, 5)),
    (2029, (2, 14), (4, 24)),
    (2030, (2, 4), (4, 13)),
];

/// Calendar shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCalendar;

impl BuiltinCalendar {
    /// Years the feast table covers.
    pub fn supported_years() -> std::ops::RangeInclusive<i32> {
        let first = FEAST_START.first().map(|f| f.0).unwrap_or(0);
        let last = FEAST_START.last().map(|f| f.0).unwrap_or(-1);
        first..=last
    }

    fn turkey(year: i32) -> HolidayResult<BTreeMap<NaiveDate, String>> {
        let unsupported = || HolidayError::UnsupportedYear {
            country: COUNTRY_CODE.to_string(),
            year,
        };

        let &(_, ramadan, sacrifice) = FEAST_START
            .iter()
            .find(|(y, _, _)| *y == year)
            .ok_or_else(unsupported)?;

        let mut map = BTreeMap::new();

        for &(month, day, name, since) in FIXED_HOLIDAYS {
            if year < since {
                continue;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                insert_holiday(&mut map, date, name);
            }
        }

        for ((month, day), name, days) in [
            (ramadan, RAMADAN_FEAST, RAMADAN_FEAST_DAYS),
            (sacrifice, SACRIFICE_FEAST, SACRIFICE_FEAST_DAYS),
        ] {
            let start = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unsupported)?;
            for offset in 0..days {
                insert_holiday(&mut map, start + Duration::days(offset), name);
            }
        }

        Ok(map)
    }
}

impl HolidaySource for BuiltinCalendar {
    fn holidays(&self, country: &str, years: &[i32]) -> HolidayResult<BTreeMap<NaiveDate, String>> {
        if !country.eq_ignore_ascii_case(COUNTRY_CODE) {
            return Err(HolidayError::UnsupportedCountry(country.to_string()));
        }

        let mut all = BTreeMap::new();
        for &year in years {
            for (date, name) in Self::turkey(year)? {
                insert_holiday(&mut all, date, &name);
            }
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::holiday_calendar;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, m, day).unwrap()
    }

    #[test]
    fn test_2022_calendar() {
        let map = BuiltinCalendar.holidays("TR", &[2022]).unwrap();

        assert_eq!(map.len(), 14);
        assert_eq!(map[&d(1, 1)], "New Year's Day");
        assert_eq!(map[&d(5, 2)], RAMADAN_FEAST);
        assert_eq!(map[&d(5, 4)], RAMADAN_FEAST);
        assert!(!map.contains_key(&d(5, 5)));
        assert_eq!(map[&d(7, 9)], SACRIFICE_FEAST);
        assert_eq!(map[&d(7, 12)], SACRIFICE_FEAST);
        assert_eq!(map[&d(10, 29)], "Republic Day");
    }

    #[test]
    fn test_2022_deduplicated_calendar() {
        let calendar = holiday_calendar(&BuiltinCalendar, "TR", 2022).unwrap();
        let names: Vec<&str> = calendar.iter().map(|e| e.holiday_name.as_str()).collect();

        assert!(names.contains(&"Ramadan Feast 3. Day"));
        assert!(names.contains(&"Sacrifice Feast 4. Day"));
        assert!(!names.contains(&"Sacrifice Feast 5. Day"));

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());

        assert!(calendar.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_country_code_case_insensitive() {
        assert!(BuiltinCalendar.holidays("tr", &[2022]).is_ok());
    }

    #[test]
    fn test_unsupported_country() {
        assert!(matches!(
            BuiltinCalendar.holidays("DE", &[2022]),
            Err(HolidayError::UnsupportedCountry(_))
        ));
    }

    #[test]
    fn test_unsupported_year() {
        assert!(matches!(
            BuiltinCalendar.holidays("TR", &[1990]),
            Err(HolidayError::UnsupportedYear { year: 1990, .. })
        ));
        assert!(BuiltinCalendar::supported_years().contains(&2022));
    }

    #[test]
    fn test_democracy_day_observed() {
        let map = BuiltinCalendar.holidays("TR", &[2018]).unwrap();
        assert!(map.values().any(|n| n == "Democracy and National Unity Day"));
    }

    #[test]
    fn test_multiple_years() {
        let map = BuiltinCalendar.holidays("TR", &[2022, 2023]).unwrap();
        assert_eq!(map.keys().next().map(|d| d.to_string()), Some("2022-01-01".to_string()));
        assert_eq!(map.keys().last().map(|d| d.to_string()), Some("2023-10-29".to_string()));
    }
}
