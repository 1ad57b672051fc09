//! CSV reader for the raw ridership dataset.
//!
//! Decodes the file (Latin-1 by default, or auto-detected), splits it with the
//! `csv` crate and turns every row into a [`Record`]. Empty cells and the
//! usual missing markers become `Value::Null`; everything else stays text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{Dataset, Record};

/// Cell spellings read as missing values.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How to decode and split the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Encoding label; `None` = detect with chardet
    pub encoding: Option<String>,
    /// Field delimiter; `None` = detect from the header line
    pub delimiter: Option<char>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: Some("iso-8859-1".to_string()),
            delimiter: Some(','),
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub dataset: Dataset,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "iso-8859-9" | "latin5" | "windows-1254" | "cp1254" => "windows-1254".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        // Every byte is the code point of the same number
        "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        other => encoding_rs::Encoding::for_label(other.as_bytes())
            .map(|enc| enc.decode(bytes).0.to_string())
            .ok_or_else(|| CsvError::EncodingError(other.to_string())),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Convert one raw cell into a JSON value.
pub fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// Parse decoded CSV text into a [`Dataset`].
///
/// # Example
/// ```ignore
/// let ds = parse_str("line,station_name\nM1,Aksaray\n", ',')?;
/// assert_eq!(ds.len(), 1);
/// ```
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Dataset> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 1,
        message: format!("delimiter '{}' is not a single byte", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_parse_error(&e))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_parse_error(&e))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(parse_cell).unwrap_or(Value::Null);
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    Ok(Dataset::new(headers, records))
}

fn csv_parse_error(err: &csv::Error) -> CsvError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CsvError::ParseError {
        line,
        message: err.to_string(),
    }
}

/// Parse raw bytes, decoding and splitting according to `options`.
pub fn parse_bytes(bytes: &[u8], options: &ReadOptions) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = options
        .encoding
        .clone()
        .unwrap_or_else(|| detect_encoding(bytes));
    let content = decode_content(bytes, &encoding)?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(&content));

    let dataset = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        dataset,
        encoding,
        delimiter,
    })
}

/// Read and parse a CSV file.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let ds = parse_str("line,station_name\nM1,Aksaray\nM2,Taksim", ',').unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.headers(), &["line", "station_name"]);
        assert_eq!(ds.records()[0]["station_name"], "Aksaray");
        assert_eq!(ds.records()[1]["line"], "M2");
    }

    #[test]
    fn test_quoted_values() {
        let csv = "line,station_name\n\"M1\",\"Yenikapi, Aksaray\"";
        let ds = parse_str(csv, ',').unwrap();

        assert_eq!(ds.records()[0]["station_name"], "Yenikapi, Aksaray");
    }

    #[test]
    fn test_missing_markers_become_null() {
        let csv = "line,station_name,town\nM1,,nan\nM2,NaN,Fatih";
        let ds = parse_str(csv, ',').unwrap();

        assert_eq!(ds.records()[0]["station_name"], Value::Null);
        assert_eq!(ds.records()[0]["town"], Value::Null);
        assert_eq!(ds.records()[1]["station_name"], Value::Null);
        assert_eq!(ds.records()[1]["town"], "Fatih");
    }

    #[test]
    fn test_pandas_missing_spellings_become_null() {
        let csv = "a,b,c,d
None,-nan,#NA,-NaN
";
        let ds = parse_str(csv, ',').unwrap();
        assert!(ds.records()[0].values().all(Value::is_null));
    }

    #[test]
    fn test_short_rows_padded() {
        let ds = parse_str("a,b,c\n1,2", ',').unwrap();
        assert_eq!(ds.records()[0]["c"], Value::Null);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let ds = parse_str("a,b\n1,2,3,4", ',').unwrap();
        assert_eq!(ds.records()[0].len(), 2);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let ds = parse_str("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(
            parse_bytes(b"", &ReadOptions::default()),
            Err(CsvError::EmptyFile)
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Baðcýlar" as stored in the Latin-1 export
        let bytes: &[u8] = &[0x42, 0x61, 0xF0, 0x63, 0xFD, 0x6C, 0x61, 0x72];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Baðcýlar");
    }

    #[test]
    fn test_latin1_decoding_is_byte_for_byte() {
        assert_eq!(decode_content(&[0x42, 0xB4, 0xBD, 0xA4], "iso-8859-1").unwrap(), "B´½¤");
        assert_eq!(decode_content(&[0xA6, 0xA8, 0xB8, 0xBC, 0xBE], "latin1").unwrap(), "¦¨¸¼¾");

        let all: Vec<u8> = (0..=255).collect();
        let decoded = decode_content(&all, "latin-1").unwrap();
        assert!(decoded.chars().map(u32::from).eq(0..=255));
    }

    #[test]
    fn test_unknown_encoding() {
        assert!(matches!(
            decode_content(b"abc", "not-a-charset"),
            Err(CsvError::EncodingError(_))
        ));
    }

    #[test]
    fn test_parse_bytes_with_detection() {
        let options = ReadOptions {
            encoding: None,
            delimiter: None,
        };
        let result = parse_bytes(b"line;station_name\nM1;Aksaray", &options).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.dataset.len(), 1);
    }
}
