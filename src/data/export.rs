use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use super::model::Table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the filtered table is empty")]
    Empty,
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error("writing CSV")]
    Csv(#[from] csv::Error),
    #[error("writing {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// Short label for one category selection.
///
/// * nothing selected → `unselected`
/// * one value → that value
/// * more → first three joined by `_`, then `_plus<N>more` for the rest
pub fn selection_label(values: &[String]) -> String {
    match values {
        [] => "unselected".to_string(),
        [only] => sanitize(only),
        _ => {
            let head: Vec<String> = values.iter().take(3).map(|v| sanitize(v)).collect();
            let rest = values.len().saturating_sub(3);
            format!("{}_plus{rest}more", head.join("_"))
        }
    }
}

/// `<major>+<minor>+<YYYYMMDD_HHMMSS>.csv`
pub fn export_file_name(major: &[String], minor: &[String], at: NaiveDateTime) -> String {
    format!(
        "{}+{}+{}.csv",
        selection_label(major),
        selection_label(minor),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Replace characters that common file systems reject.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `table` as BOM-prefixed UTF-8 CSV.
pub fn write_csv<W: Write>(table: &Table, mut out: W) -> Result<(), ExportError> {
    out.write_all(UTF8_BOM).map_err(csv::Error::from)?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `table` to `path`, replacing any existing file.
pub fn save_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }
    let file = fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, std::io::BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write `table` as `dir/file_name`, creating `dir` when absent.
///
/// Returns the path written.
pub fn save_to_dir(table: &Table, dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    let name = file_name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ExportError::InvalidName(file_name.to_string()));
    }
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(name);
    save_csv(table, &path)?;
    Ok(path)
}
