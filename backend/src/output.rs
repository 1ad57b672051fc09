//! CSV persistence of the processed dataset and the holiday calendar.
//!
//! Outputs are first written to a temporary sibling, then renamed into place.
//! Several outputs staged together are committed with [`commit_all`], so a
//! failed run leaves none of them behind.

use csv::WriterBuilder;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::logs::log_error;
use crate::models::{Dataset, HolidayEntry};

/// Text written for one cell. Missing values become empty fields.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// An output fully written to its temporary sibling, not yet in place.
///
/// Dropping it removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Already renamed on success
        let _ = fs::remove_file(&self.tmp);
    }
}

fn stage<F>(path: &Path, write: F) -> csv::Result<StagedFile>
where
    F: FnOnce(&Path) -> csv::Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staged = StagedFile {
        tmp: temp_path(path),
        target: path.to_path_buf(),
    };
    write(&staged.tmp)?;
    Ok(staged)
}

/// Move every staged file into place.
///
/// All or nothing: if one rename fails, the outputs already moved are
/// removed and the remaining temporaries are dropped.
pub fn commit_all(staged: Vec<StagedFile>) -> io::Result<()> {
    let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());

    for file in &staged {
        if let Err(e) = fs::rename(&file.tmp, &file.target) {
            log_error(format!("Could not write {}: {}", file.target.display(), e));
            for path in committed {
                let _ = fs::remove_file(path);
            }
            return Err(e);
        }
        committed.push(&file.target);
    }
    Ok(())
}

/// Write the dataset to the temporary sibling of `path`.
pub fn stage_dataset_csv(dataset: &Dataset, path: &Path) -> csv::Result<StagedFile> {
    stage(path, |tmp| {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(tmp)?;

        writer.write_record(dataset.headers())?;
        for record in dataset.records() {
            writer.write_record(dataset.row_values(record).map(render_cell))?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Write the holiday calendar, as `Date,Holiday`, to the temporary sibling of `path`.
pub fn stage_holidays_csv(entries: &[HolidayEntry], path: &Path) -> csv::Result<StagedFile> {
    stage(path, |tmp| {
        let mut writer = WriterBuilder::new().has_headers(true).from_path(tmp)?;

        if entries.is_empty() {
            writer.write_record(["Date", "Holiday"])?;
        }
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Write the dataset with a header row, columns in dataset order.
pub fn write_dataset_csv(dataset: &Dataset, path: &Path) -> csv::Result<()> {
    commit_all(vec![stage_dataset_csv(dataset, path)?])?;
    Ok(())
}

/// Write the holiday calendar as `Date,Holiday`.
pub fn write_holidays_csv(entries: &[HolidayEntry], path: &Path) -> csv::Result<()> {
    commit_all(vec![stage_holidays_csv(entries, path)?])?;
    Ok(())
}
