use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use thiserror::Error;

use super::model::{ColumnNames, Dataset, Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows shown when a file is rejected for missing columns.
pub const PREVIEW_ROWS: usize = 50;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file is neither valid UTF-8 nor Shift_JIS")]
    Decode,
    #[error("parsing CSV")]
    Csv(#[from] csv::Error),
    #[error("CSV record {record} has {found} fields, the header has {expected}")]
    ExtraFields {
        record: usize,
        found: usize,
        expected: usize,
    },
    /// The file parsed but lacks required columns. `preview` holds its first
    /// rows for display.
    #[error("required columns not found: {missing:?}")]
    MissingColumns { missing: Vec<String>, preview: Table },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and validate a CSV file.
pub fn load_file(path: &Path, columns: &ColumnNames) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (table, encoding) = decode_and_parse(&bytes)?;
    log::info!(
        "Read {} rows x {} columns from {} ({})",
        table.len(),
        table.headers.len(),
        path.display(),
        encoding.name()
    );
    validate(table, columns)
}

/// Decode `bytes` (UTF-8, falling back to Shift_JIS) and parse them as CSV
/// with a header row. Returns the encoding that succeeded.
pub fn decode_and_parse(bytes: &[u8]) -> Result<(Table, &'static Encoding), LoadError> {
    let (text, encoding) = decode(bytes)?;
    Ok((parse_csv(&text)?, encoding))
}

/// Check the required columns and build the dataset.
pub fn validate(table: Table, columns: &ColumnNames) -> Result<Dataset, LoadError> {
    Dataset::from_table(table, columns).map_err(|(missing, table)| {
        log::error!("Rejected table, missing columns {missing:?}");
        LoadError::MissingColumns {
            missing,
            preview: table.head(PREVIEW_ROWS),
        }
    })
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Strict UTF-8 first, then one retry as Shift_JIS.
fn decode(bytes: &[u8]) -> Result<(String, &'static Encoding), LoadError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return Ok((text.into_owned(), UTF_8));
    }

    log::warn!("Input is not valid UTF-8, retrying as {}", SHIFT_JIS.name());
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| (text.into_owned(), SHIFT_JIS))
        .ok_or(LoadError::Decode)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse with the first row as header.
///
/// Records shorter than the header are padded with empty cells so every row
/// has one cell per column. Longer records are an error.
fn parse_csv(text: &str) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for (record_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(LoadError::ExtraFields {
                record: record_no + 1,
                found: record.len(),
                expected: width,
            });
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "大項目,中項目,ページ,備考\n食品,野菜,10-12,新鮮\n雑貨,文具,p3,\n";

    #[test]
    fn parses_utf8() {
        let (table, enc) = decode_and_parse(CSV.as_bytes()).unwrap();
        assert_eq!(enc, UTF_8);
        assert_eq!(table.headers, vec!["大項目", "中項目", "ページ", "備考"]);
        assert_eq!(table.rows[1], vec!["雑貨", "文具", "p3", ""]);
    }

    #[test]
    fn strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(CSV.as_bytes());
        let (table, _) = decode_and_parse(&bytes).unwrap();
        assert_eq!(table.headers[0], "大項目");
    }

    #[test]
    fn falls_back_to_shift_jis() {
        let (encoded, _, had_errors) = SHIFT_JIS.encode(CSV);
        assert!(!had_errors);
        let (table, enc) = decode_and_parse(&encoded).unwrap();
        assert_eq!(enc, SHIFT_JIS);
        assert_eq!(table.rows[0], vec!["食品", "野菜", "10-12", "新鮮"]);
    }

    #[test]
    fn undecodable_bytes_fail() {
        // 0x85 0x40 is neither UTF-8 nor an assigned Shift_JIS pair.
        let err = decode_and_parse(b"a,b\n\x85\x40,1\n").unwrap_err();
        assert!(matches!(err, LoadError::Decode));
    }

    #[test]
    fn short_rows_are_padded() {
        let (table, _) =
            decode_and_parse("大項目,中項目,ページ,備考\n食品,野菜,10\n雑貨,文具,p3,x\n".as_bytes())
                .unwrap();
        assert_eq!(table.rows[0], vec!["食品", "野菜", "10", ""]);
        assert_eq!(table.rows[1], vec!["雑貨", "文具", "p3", "x"]);

        let ds = validate(table, &ColumnNames::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.pages[0].page_numbers(), vec![10]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = decode_and_parse(b"a,b\n1,2\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::ExtraFields {
                record: 2,
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn missing_columns_carry_a_preview() {
        let mut text = String::from("大項目,備考\n");
        for i in 0..80 {
            text.push_str(&format!("x{i},y\n"));
        }
        let (table, _) = decode_and_parse(text.as_bytes()).unwrap();
        match validate(table, &ColumnNames::default()).unwrap_err() {
            LoadError::MissingColumns { missing, preview } => {
                assert_eq!(missing, vec!["中項目", "ページ"]);
                assert_eq!(preview.len(), PREVIEW_ROWS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, CSV).unwrap();
        let ds = load_file(&path, &ColumnNames::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.major_values, vec!["雑貨", "食品"]);
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv"), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
