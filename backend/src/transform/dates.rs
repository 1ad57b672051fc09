//! Calendar features derived from the transaction date.
//!
//! `transaction_year/month/day` become `year/month/day` and feed a composed
//! `date`. From that date the stage writes the month name (over `month`),
//! the ISO week, a week-of-month index, the weekday name and a weekend flag.
//!
//! The week-of-month index is `(day - 1) / 7 + 1`: days 1-7 are week 1,
//! 8-14 week 2 and so on, whatever weekday the month starts on.

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{TransformError, TransformResult};
use crate::logs::{log_info, log_success};
use crate::models::{columns, Dataset, Record};

/// Features derived from one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateFeatures {
    pub date: NaiveDate,
    pub month: &'static str,
    pub week: u32,
    pub week_number: u32,
    pub day_of_week: &'static str,
    pub weekend_status: u8,
}

impl DateFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            month: month_name(date.month()),
            week: date.iso_week().week(),
            week_number: week_of_month(date.day()),
            day_of_week: weekday_name(weekday),
            weekend_status: weekend_status(weekday),
        }
    }
}

/// 1-based week of the month computed from the day alone.
pub fn week_of_month(day: u32) -> u32 {
    (day.saturating_sub(1)) / 7 + 1
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// 1 for Saturday and Sunday (index > 4 counting Monday as 0), else 0.
pub fn weekend_status(weekday: Weekday) -> u8 {
    u8::from(weekday.num_days_from_monday() > 4)
}

/// Read an integer cell. Accepts `"4"`, `4`, and float spellings such as `"4.0"`.
fn read_integer(record: &Record, row: usize, column: &str) -> TransformResult<i64> {
    let not_integer = |value: String| TransformError::NotInteger {
        row,
        column: column.to_string(),
        value,
    };

    match record.get(column) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| not_integer(n.to_string())),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| not_integer(s.clone()))
        }
        Some(other) => Err(not_integer(other.to_string())),
        None => Err(not_integer("null".to_string())),
    }
}

/// Compose the calendar date of one record from its `year/month/day` cells.
pub fn record_date(record: &Record, row: usize) -> TransformResult<NaiveDate> {
    let year = read_integer(record, row, columns::YEAR)?;
    let month = read_integer(record, row, columns::MONTH)?;
    let day = read_integer(record, row, columns::DAY)?;

    let invalid = || TransformError::InvalidDate { row, year, month, day };

    let y = i32::try_from(year).map_err(|_| invalid())?;
    let m = u32::try_from(month).map_err(|_| invalid())?;
    let d = u32::try_from(day).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid)
}

/// Rename the transaction date columns and add the derived calendar columns.
///
/// Fails on the first row whose triple is not a real date; no row is
/// dropped or reordered.
pub fn derive_date_features(mut dataset: Dataset) -> TransformResult<Dataset> {
    dataset.require_column(columns::TRANSACTION_YEAR)?;
    dataset.require_column(columns::TRANSACTION_MONTH)?;
    dataset.require_column(columns::TRANSACTION_DAY)?;

    log_info("📅 Deriving date features...");

    dataset.rename_columns(&[
        (columns::TRANSACTION_YEAR, columns::YEAR),
        (columns::TRANSACTION_MONTH, columns::MONTH),
        (columns::TRANSACTION_DAY, columns::DAY),
    ]);

    // Validate every row before touching any cell
    let features = dataset
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| record_date(record, row).map(DateFeatures::from_date))
        .collect::<TransformResult<Vec<_>>>()?;

    for column in [
        columns::DATE,
        columns::WEEK,
        columns::WEEK_NUMBER,
        columns::DAY_OF_WEEK,
        columns::WEEKEND_STATUS,
    ] {
        dataset.ensure_column(column);
    }

    for (record, f) in dataset.records_mut().iter_mut().zip(&features) {
        record.insert(columns::YEAR.to_string(), json!(f.date.year()));
        record.insert(columns::MONTH.to_string(), json!(f.month));
        record.insert(columns::DAY.to_string(), json!(f.date.day()));
        record.insert(columns::DATE.to_string(), json!(f.date.format("%Y-%m-%d").to_string()));
        record.insert(columns::WEEK.to_string(), json!(f.week));
        record.insert(columns::WEEK_NUMBER.to_string(), json!(f.week_number));
        record.insert(columns::DAY_OF_WEEK.to_string(), json!(f.day_of_week));
        record.insert(columns::WEEKEND_STATUS.to_string(), json!(f.weekend_status));
    }

    log_success(format!("Derived date features for {} rows", features.len()));
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: Vec<Value>) -> Dataset {
        Dataset::from_values(
            vec![
                "line".into(),
                "station_name".into(),
                "transaction_year".into(),
                "transaction_month".into(),
                "transaction_day".into(),
                "passenger_cnt".into(),
            ],
            rows,
        )
    }

    fn row(year: &str, month: &str, day: &str) -> Value {
        json!({
            "line": "M1A",
            "station_name": "Aksaray",
            "transaction_year": year,
            "transaction_month": month,
            "transaction_day": day,
            "passenger_cnt": "120"
        })
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(1), 1);
        assert_eq!(week_of_month(7), 1);
        assert_eq!(week_of_month(8), 2);
        assert_eq!(week_of_month(15), 3);
        assert_eq!(week_of_month(29), 5);
        assert_eq!(week_of_month(31), 5);
        for d in 1..=31 {
            assert_eq!(week_of_month(d), (d - 1) / 7 + 1);
        }
    }

    #[test]
    fn test_week_of_month_ignores_weekday_alignment() {
        // 2022-05-01 is a Sunday, 2022-08-01 a Monday: both are week 1
        let may = DateFeatures::from_date(NaiveDate::from_ymd_opt(2022, 5, 1).unwrap());
        let aug = DateFeatures::from_date(NaiveDate::from_ymd_opt(2022, 8, 1).unwrap());
        assert_eq!(may.week_number, 1);
        assert_eq!(aug.week_number, 1);
        let may8 = DateFeatures::from_date(NaiveDate::from_ymd_opt(2022, 5, 8).unwrap());
        assert_eq!(may8.week_number, 2);
    }

    #[test]
    fn test_features_for_april_15() {
        let f = DateFeatures::from_date(NaiveDate::from_ymd_opt(2022, 4, 15).unwrap());
        assert_eq!(f.month, "April");
        assert_eq!(f.day_of_week, "Friday");
        assert_eq!(f.week, 15);
        assert_eq!(f.week_number, 3);
        assert_eq!(f.weekend_status, 0);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2022-01-01 is a Saturday belonging to ISO week 52 of 2021
        let f = DateFeatures::from_date(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(f.week, 52);
        assert_eq!(f.weekend_status, 1);
        assert_eq!(f.day_of_week, "Saturday");
    }

    #[test]
    fn test_weekend_status_matches_day_name() {
        let mut date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        while date.year() == 2022 {
            let f = DateFeatures::from_date(date);
            let weekend = f.day_of_week == "Saturday" || f.day_of_week == "Sunday";
            assert_eq!(f.weekend_status == 1, weekend, "{}", date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_derive_date_features() {
        let ds = dataset(vec![row("2022", "4", "15"), row("2022", "12", "31")]);
        let out = derive_date_features(ds).unwrap();

        assert_eq!(
            out.headers(),
            &[
                "line",
                "station_name",
                "year",
                "month",
                "day",
                "passenger_cnt",
                "date",
                "week",
                "week_number",
                "day_of_week",
                "weekend_status"
            ]
        );

        let first = &out.records()[0];
        assert_eq!(first["year"], 2022);
        assert_eq!(first["month"], "April");
        assert_eq!(first["day"], 15);
        assert_eq!(first["date"], "2022-04-15");
        assert_eq!(first["week"], 15);
        assert_eq!(first["week_number"], 3);
        assert_eq!(first["day_of_week"], "Friday");
        assert_eq!(first["weekend_status"], 0);
        assert_eq!(first["passenger_cnt"], "120");

        let last = &out.records()[1];
        assert_eq!(last["month"], "December");
        assert_eq!(last["day_of_week"], "Saturday");
        assert_eq!(last["week_number"], 5);
        assert_eq!(last["weekend_status"], 1);
    }

    #[test]
    fn test_derive_accepts_float_spellings() {
        let ds = dataset(vec![row("2022.0", "4.0", "15")]);
        let out = derive_date_features(ds).unwrap();
        assert_eq!(out.records()[0]["date"], "2022-04-15");
    }

    #[test]
    fn test_invalid_date_fails_whole_run() {
        let ds = dataset(vec![row("2022", "4", "15"), row("2022", "4", "31")]);
        let err = derive_date_features(ds).unwrap_err();
        assert!(matches!(
            err,
            TransformError::InvalidDate { row: 1, year: 2022, month: 4, day: 31 }
        ));
    }

    #[test]
    fn test_non_integer_component() {
        let ds = dataset(vec![row("2022", "April", "15")]);
        assert!(matches!(
            derive_date_features(ds),
            Err(TransformError::NotInteger { row: 0, ref column, .. }) if column == "month"
        ));
    }

    #[test]
    fn test_missing_component() {
        let mut r = row("2022", "4", "15");
        r["transaction_day"] = Value::Null;
        let ds = dataset(vec![r]);
        assert!(matches!(
            derive_date_features(ds),
            Err(TransformError::NotInteger { ref value, .. }) if value == "null"
        ));
    }

    #[test]
    fn test_requires_transaction_columns() {
        let ds = Dataset::from_values(vec!["year".into()], vec![json!({"year": "2022"})]);
        assert!(matches!(
            derive_date_features(ds),
            Err(TransformError::MissingColumn(c)) if c == "transaction_year"
        ));
    }

    #[test]
    fn test_month_name_out_of_range() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(13), "");
    }
}
