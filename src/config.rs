use std::env;
use std::path::PathBuf;

use crate::data::model::ColumnNames;

/// Environment variable naming a CSV offered as a demo input.
pub const SAMPLE_CSV_ENV: &str = "SAMPLE_CSV_PATH";
/// Environment variable overriding the export directory.
pub const OUTPUT_DIR_ENV: &str = "CSV_FILTER_OUTPUT_DIR";
/// Environment variable naming a font file with Japanese glyphs.
pub const CJK_FONT_ENV: &str = "CJK_FONT_PATH";

const DEFAULT_OUTPUT_DIR: &str = "outputs";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Settings read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sample CSV, only kept when the file exists.
    pub sample_csv: Option<PathBuf>,
    /// Directory used by "Save to output dir".
    pub output_dir: PathBuf,
    pub columns: ColumnNames,
    pub cjk_font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sample_csv: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            columns: ColumnNames::default(),
            cjk_font: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let sample_csv = get(SAMPLE_CSV_ENV).filter(|p| {
            let exists = p.is_file();
            if !exists {
                log::warn!("{SAMPLE_CSV_ENV}={} does not exist, ignoring", p.display());
            }
            exists
        });

        AppConfig {
            sample_csv,
            output_dir: get(OUTPUT_DIR_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            columns: ColumnNames::default(),
            cjk_font: get(CJK_FONT_ENV),
        }
    }
}
