//! Missing-value handling.
//!
//! [`drop_invalid_rows`] removes records without a station identity.
//! [`analyze_nulls`] only reports: per line, the shape and per-column null
//! counts of every line group holding at least one missing cell.

use serde::Serialize;
use serde_json::Value;

use crate::error::TransformResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{columns, Dataset};

/// Null statistics for one line group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineNullReport {
    /// Line name; `None` groups records whose line is missing
    pub line: Option<String>,
    /// Rows in the group
    pub rows: usize,
    /// Columns in the group
    pub columns: usize,
    /// Missing cells per column, in header order
    pub null_counts: Vec<(String, usize)>,
}

impl LineNullReport {
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }
}

/// Drop every record whose `station_name` is missing.
///
/// Logs the table shape before and after.
pub fn drop_invalid_rows(mut dataset: Dataset) -> TransformResult<Dataset> {
    dataset.require_column(columns::STATION_NAME)?;

    let (rows, cols) = dataset.shape();
    log_info(format!("Before dropping missing station names: {} rows x {} columns", rows, cols));

    dataset.retain(|record| {
        !record
            .get(columns::STATION_NAME)
            .map_or(true, Value::is_null)
    });

    let (kept, cols) = dataset.shape();
    log_info(format!("After dropping missing station names: {} rows x {} columns", kept, cols));
    if kept < rows {
        log_warning(format!("{} rows without station name dropped", rows - kept));
    }

    Ok(dataset)
}

/// Report null counts per line group, in order of first appearance.
///
/// Groups without any missing cell are omitted. The dataset is not changed.
pub fn analyze_nulls(dataset: &Dataset) -> TransformResult<Vec<LineNullReport>> {
    dataset.require_column(columns::LINE)?;

    let headers = dataset.headers();
    let mut order: Vec<Option<String>> = Vec::new();
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();

    for record in dataset.records() {
        let line = record
            .get(columns::LINE)
            .and_then(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            });

        let idx = match order.iter().position(|l| *l == line) {
            Some(idx) => idx,
            None => {
                order.push(line);
                groups.push((0, vec![0; headers.len()]));
                order.len() - 1
            }
        };

        let (rows, counts) = &mut groups[idx];
        *rows += 1;
        for (i, value) in dataset.row_values(record).enumerate() {
            if value.is_null() {
                counts[i] += 1;
            }
        }
    }

    let reports: Vec<LineNullReport> = order
        .into_iter()
        .zip(groups)
        .filter(|(_, (_, counts))| counts.iter().any(|&n| n > 0))
        .map(|(line, (rows, counts))| LineNullReport {
            line,
            rows,
            columns: headers.len(),
            null_counts: headers.iter().cloned().zip(counts).collect(),
        })
        .collect();

    for report in &reports {
        log_warning(format!(
            "{}: {} rows x {} columns, {} missing cells",
            report.line.as_deref().unwrap_or("<missing line>"),
            report.rows,
            report.columns,
            report.total_nulls()
        ));
        for (column, count) in report.null_counts.iter().filter(|(_, n)| *n > 0) {
            log_info_indent(format!("{}: {}", column, count), 1);
        }
    }
    if reports.is_empty() {
        log_success("No missing values in any line");
    }

    Ok(reports)
}
