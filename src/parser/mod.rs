//! Raw survey export ingestion.
//!
//! Accepts the two shapes survey platforms actually hand over: an Excel
//! workbook (`.xlsx`/`.xls`, first sheet) or a delimited text export with
//! unknown encoding. CSV encoding and delimiter are auto-detected; workbook
//! cells are normalized to text before entering the pipeline.
//!
//! Header texts are the literal question wordings. They are trimmed and the
//! non-standard quote characters some platforms emit (‘ ’) are normalized to
//! ASCII apostrophes so they match the questionnaire definition exactly.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{info, warn};

use crate::error::{SourceError, SourceResult};
use crate::model::{Cell, Dataset};

/// How the input file was read.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFormat {
    /// Excel workbook; the value is the sheet name used.
    Workbook(String),
    /// Delimited text with detected encoding and delimiter.
    Delimited { encoding: String, delimiter: char },
}

/// A loaded export: the raw dataset plus how it was read.
#[derive(Debug)]
pub struct LoadedExport {
    pub dataset: Dataset,
    pub format: SourceFormat,
}

/// Read a survey export from disk, dispatching on the file extension.
pub fn load_export(path: &Path) -> SourceResult<LoadedExport> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let loaded = match ext.as_str() {
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => load_workbook(path)?,
        _ => load_delimited(path)?,
    };

    info!(
        rows = loaded.dataset.n_rows(),
        columns = loaded.dataset.n_columns(),
        "loaded survey export"
    );
    Ok(loaded)
}

/// Normalize a header: trim and replace curly single quotes with ASCII
/// apostrophes, matching the questionnaire definition texts.
pub fn clean_header(raw: &str) -> String {
    raw.trim().replace(['\u{2018}', '\u{2019}'], "'")
}

// =============================================================================
// Workbook input
// =============================================================================

fn load_workbook(path: &Path) -> SourceResult<LoadedExport> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SourceError::Workbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SourceError::EmptyFile)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SourceError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(SourceError::NoHeaders)?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| clean_header(&data_to_text(c)))
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(SourceError::NoHeaders);
    }

    let mut dataset = Dataset::new(headers);
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(data_to_cell).collect();
        if cells.iter().all(Cell::is_missing) && cells.len() < dataset.n_columns() {
            // trailing ragged blank rows are common at the end of exports
            continue;
        }
        dataset.push_row(cells);
    }

    Ok(LoadedExport {
        dataset,
        format: SourceFormat::Workbook(sheet_name),
    })
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        _ => Cell::from_raw(&data_to_text(data)),
    }
}

/// Render a workbook cell as the text the respondent (or platform) entered.
/// Whole floats lose their trailing `.0` so IDs and postcodes survive Excel's
/// numeric coercion; datetimes are rendered in the canonical layout.
fn data_to_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => {
                warn!("unrepresentable datetime cell, treating as missing");
                String::new()
            }
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            warn!(error = ?e, "error cell in workbook, treating as missing");
            String::new()
        }
    }
}

// =============================================================================
// Delimited text input
// =============================================================================

fn load_delimited(path: &Path) -> SourceResult<LoadedExport> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(SourceError::EmptyFile);
    }

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let dataset = parse_delimited(&content, delimiter)?;

    Ok(LoadedExport {
        dataset,
        format: SourceFormat::Delimited {
            encoding,
            delimiter,
        },
    })
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes using the detected encoding, falling back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding {
        "iso-8859-1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting candidates in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");
    let candidates = [',', ';', '\t', '|'];

    let mut best = ',';
    let mut best_count = 0;
    for &sep in &candidates {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

fn parse_delimited(content: &str, delimiter: char) -> SourceResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SourceError::Csv(e.to_string()))?
        .iter()
        .map(clean_header)
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SourceError::NoHeaders);
    }

    let mut dataset = Dataset::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::Csv(e.to_string()))?;
        let cells: Vec<Cell> = record.iter().map(Cell::from_raw).collect();
        dataset.push_row(cells);
    }

    Ok(dataset)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clean_header_normalizes_quotes() {
        let raw = " Thinking about \u{2018}Origin\u{2019}, how favourable is your overall impression of them? ";
        assert_eq!(
            clean_header(raw),
            "Thinking about 'Origin', how favourable is your overall impression of them?"
        );
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_parse_delimited_basic() {
        let csv = "ID,What is your gender?\n1,Male\n2,\n";
        let ds = parse_delimited(csv, ',').unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.get(0, "What is your gender?"), Some(&Cell::Text("Male".into())));
        assert_eq!(ds.get(1, "What is your gender?"), Some(&Cell::Missing));
    }

    #[test]
    fn test_parse_delimited_short_rows_padded() {
        let csv = "a,b,c\n1,2\n";
        let ds = parse_delimited(csv, ',').unwrap();
        assert_eq!(ds.get(0, "c"), Some(&Cell::Missing));
    }

    #[test]
    fn test_load_csv_export_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "ID,What is your age?").unwrap();
        writeln!(file, "10,25-34").unwrap();
        let loaded = load_export(file.path()).unwrap();
        assert_eq!(loaded.dataset.n_rows(), 1);
        match loaded.format {
            SourceFormat::Delimited { delimiter, .. } => assert_eq!(delimiter, ','),
            other => panic!("expected delimited, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("ID,Age\n1,25".as_bytes()), "utf-8");
    }

    #[test]
    fn test_decode_latin1() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert!(decoded.starts_with("Soci"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_export(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
