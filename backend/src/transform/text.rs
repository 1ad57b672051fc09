//! Station and town name normalization.
//!
//! The raw export stores Turkish letters through a Latin-1 lens (`ð` for `ğ`,
//! `þ` for `ş`, ...). [`TextNormalizer`] folds those to ASCII and strips the
//! platform, exit and direction suffixes that split one station into several
//! names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TransformError, TransformResult};
use crate::logs::{log_info, log_success};
use crate::models::{columns, value_kind, Dataset};

/// Literal text a stringified missing value turns into.
pub const STRINGIFIED_MISSING: &str = "nan";

/// Translation and noise tables used by [`TextNormalizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerTables {
    /// (source, replacement) pairs, applied in order
    pub translations: Vec<(char, char)>,
    /// Substrings removed from station names, applied in order
    pub noise_words: Vec<String>,
}

impl Default for NormalizerTables {
    fn default() -> Self {
        let translations = vec![
            ('ð', 'g'),
            ('þ', 's'),
            ('ý', 'i'),
            ('Ý', 'I'),
            ('Þ', 'S'),
            ('Ð', 'G'),
        ];

        let noise_words = [
            " Kuzey",
            " Güney",
            " 2",
            " 3 Stad Girisi",
            " Dogu",
            " 1 Bati",
            " kuzey",
            " güney",
            " 1",
            "-1",
            "-2",
            "-3",
            "-4",
            " M7 Hol 3",
            " M7 Hol 1",
            " M7 Hol",
            "M7 Hol 4",
            " (Dogu)",
            " (Bati)",
            " (Dogu/Adliye)",
            "M4 ",
            " Bati konkors",
            " konkors",
            " DOGU",
            " M7 HOL",
            " M7 HOL 1",
            " BATI",
            " M3 HOL 4",
            " M3 HOL 3",
            "M7 ",
            " Çayirbasi",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();

        Self {
            translations,
            noise_words,
        }
    }
}

impl NormalizerTables {
    /// Load tables from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Applies [`NormalizerTables`] to free text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    tables: NormalizerTables,
}

impl TextNormalizer {
    pub fn new(tables: NormalizerTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &NormalizerTables {
        &self.tables
    }

    /// Replace every translation-table character with its ASCII target.
    pub fn replace_chars(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (from, to) in &self.tables.translations {
            if text.contains(*from) {
                text = text.replace(*from, &to.to_string());
            }
        }
        text
    }

    /// Remove every noise word, in table order.
    pub fn remove_words(&self, text: &str) -> String {
        remove_words(text, &self.tables.noise_words)
    }

    /// Replace characters in every text cell of `column`.
    ///
    /// Missing cells stay missing; any other non-text cell is an error.
    pub fn replace_chars_in_column(&self, dataset: &mut Dataset, column: &str) -> TransformResult<()> {
        map_text_column(dataset, column, |s| self.replace_chars(s))
    }

    /// Strip noise words from every text cell of `column`.
    pub fn remove_words_in_column(&self, dataset: &mut Dataset, column: &str) -> TransformResult<()> {
        map_text_column(dataset, column, |s| self.remove_words(s))
    }
}

/// Remove every occurrence of each word, in list order.
pub fn remove_words<S: AsRef<str>>(text: &str, words: &[S]) -> String {
    let mut text = text.to_string();
    for word in words {
        let word = word.as_ref();
        if !word.is_empty() {
            text = text.replace(word, "");
        }
    }
    text
}

fn map_text_column<F>(dataset: &mut Dataset, column: &str, f: F) -> TransformResult<()>
where
    F: Fn(&str) -> String,
{
    dataset.require_column(column)?;

    for (row, record) in dataset.records_mut().iter_mut().enumerate() {
        match record.get_mut(column) {
            Some(Value::String(s)) => *s = f(s),
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(TransformError::NotText {
                    row,
                    column: column.to_string(),
                    found: value_kind(other),
                })
            }
        }
    }
    Ok(())
}

/// Turn every cell spelled `nan` back into the missing marker.
///
/// Returns the number of cells converted.
pub fn restore_missing(dataset: &mut Dataset) -> usize {
    let mut restored = 0;
    for record in dataset.records_mut() {
        for value in record.values_mut() {
            if value.as_str() == Some(STRINGIFIED_MISSING) {
                *value = Value::Null;
                restored += 1;
            }
        }
    }
    restored
}

/// Normalize `town` and `station_name`.
///
/// Characters are translated in both columns, noise words are removed from
/// station names, then stringified missing values are restored to `Null`
/// across the whole table. Row count never changes.
pub fn text_processing(mut dataset: Dataset, normalizer: &TextNormalizer) -> TransformResult<Dataset> {
    log_info("🔤 Normalizing station and town names...");

    normalizer.replace_chars_in_column(&mut dataset, columns::TOWN)?;
    normalizer.replace_chars_in_column(&mut dataset, columns::STATION_NAME)?;
    normalizer.remove_words_in_column(&mut dataset, columns::STATION_NAME)?;

    let restored = restore_missing(&mut dataset);
    if restored > 0 {
        log_info(format!("{} '{}' cells marked as missing", restored, STRINGIFIED_MISSING));
    }
    log_success(format!("Normalized {} rows", dataset.len()));

    Ok(dataset)
}
