use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use crate::config::AppConfig;
use crate::data::export::{export_file_name, save_csv, save_to_dir};
use crate::data::filter::{CategorySelection, FilterInput, compute_filtered_table, filtered_indices};
use crate::data::loader::{LoadError, load_file};
use crate::data::model::{Dataset, Table};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Message shown at the top of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// A file that parsed but lacked required columns.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub missing: Vec<String>,
    pub preview: Table,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until a valid file is opened).
    pub dataset: Option<Dataset>,

    /// Last file rejected for missing columns, shown instead of the filters.
    pub rejected: Option<Rejected>,

    /// Current checklist and range inputs.
    pub input: FilterInput,

    /// Input the cached indices were computed from.
    applied_input: FilterInput,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Editable export file name, regenerated when the selection changes.
    pub export_name: String,

    /// Whether the configured sample file is the active input.
    pub use_sample: bool,

    /// Path of the loaded file, for the title bar.
    pub source_path: Option<PathBuf>,

    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: None,
            rejected: None,
            input: FilterInput::default(),
            applied_input: FilterInput::default(),
            visible_indices: Vec::new(),
            export_name: String::new(),
            use_sample: false,
            source_path: None,
            status: None,
        }
    }

    /// Load a CSV file and make it the active dataset.
    ///
    /// Failures are reported through `status` (and `rejected` for files
    /// missing required columns); the previous dataset is dropped either way.
    pub fn load_path(&mut self, path: &Path) {
        self.dataset = None;
        self.rejected = None;
        self.visible_indices.clear();
        self.source_path = Some(path.to_path_buf());

        match load_file(path, &self.config.columns) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows, {} major / {} minor categories",
                    dataset.len(),
                    dataset.major_values.len(),
                    dataset.minor_values.len()
                );
                self.set_dataset(dataset);
            }
            Err(LoadError::MissingColumns { missing, preview }) => {
                self.status = Some(Status::Error(format!(
                    "Required columns not found: {}. The CSV needs {}.",
                    missing.join(", "),
                    self.config.columns.all().join(", ")
                )));
                self.rejected = Some(Rejected { missing, preview });
            }
            Err(e) => {
                let err = anyhow::Error::new(e)
                    .context(format!("Failed to load {}", path.display()));
                log::error!("{err:#}");
                self.status = Some(Status::Error(format!("{err:#}")));
            }
        }
    }

    /// Switch the configured sample file on or off as the active input.
    pub fn set_use_sample(&mut self, on: bool) {
        let Some(sample) = self.config.sample_csv.clone() else {
            return;
        };
        self.use_sample = on;
        if on {
            self.load_path(&sample);
        } else if self.source_path.as_deref() == Some(sample.as_path()) {
            self.clear();
        }
    }

    /// Forget the loaded file.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.rejected = None;
        self.source_path = None;
        self.visible_indices.clear();
        self.input = FilterInput::default();
        self.applied_input = FilterInput::default();
        self.export_name.clear();
        self.status = None;
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.input = FilterInput::for_dataset(&dataset);
        self.applied_input = self.input.clone();
        self.visible_indices = filtered_indices(&dataset, &self.input);
        self.dataset = Some(dataset);
        self.rejected = None;
        self.status = None;
        self.regenerate_export_name(Local::now().naive_local());
    }

    /// Recompute the filtered rows if any input changed since last time.
    ///
    /// Returns whether anything was recomputed.
    pub fn refilter(&mut self) -> bool {
        if self.input == self.applied_input {
            return false;
        }
        let selection_changed = self.input.major != self.applied_input.major
            || self.input.minor != self.applied_input.minor;
        self.applied_input = self.input.clone();

        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.input);
        }
        if selection_changed {
            self.regenerate_export_name(Local::now().naive_local());
        }
        true
    }

    /// Replace the export name with a fresh generated one.
    pub fn regenerate_export_name(&mut self, at: NaiveDateTime) {
        self.export_name = export_file_name(self.input.major.values(), self.input.minor.values(), at);
    }

    /// Select every value of the major (`major = true`) or minor column.
    pub fn select_all(&mut self, major: bool) {
        let Some(ds) = &self.dataset else { return };
        if major {
            self.input.major = CategorySelection::all(&ds.major_values);
        } else {
            self.input.minor = CategorySelection::all(&ds.minor_values);
        }
    }

    /// Deselect every value of the major or minor column.
    pub fn select_none(&mut self, major: bool) {
        if major {
            self.input.major.clear();
        } else {
            self.input.minor.clear();
        }
    }

    pub fn total_rows(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len)
    }

    pub fn can_export(&self) -> bool {
        !self.visible_indices.is_empty()
    }

    /// The current filtered table, without derived columns.
    pub fn filtered_table(&self) -> Option<Table> {
        self.dataset
            .as_ref()
            .map(|ds| compute_filtered_table(ds, &self.input))
    }

    /// Write the filtered rows into the configured output directory.
    pub fn save_to_output_dir(&mut self) -> Result<PathBuf> {
        let table = self.filtered_table().context("no file loaded")?;
        let path = save_to_dir(&table, &self.config.output_dir, &self.export_name)
            .with_context(|| format!("saving into {}", self.config.output_dir.display()))?;
        self.status = Some(Status::Info(format!("Saved: {}", path.display())));
        Ok(path)
    }

    /// Write the filtered rows to an explicit path.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let table = self.filtered_table().context("no file loaded")?;
        save_csv(&table, path).with_context(|| format!("saving {}", path.display()))?;
        self.status = Some(Status::Info(format!("Saved: {}", path.display())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "大項目,中項目,ページ\nA,x,1\nA,y,5-7\nB,x,p9\n";

    fn loaded(dir: &tempfile::TempDir) -> AppState {
        let path = dir.path().join("in.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = AppState::new(AppConfig {
            output_dir: dir.path().join("outputs"),
            ..AppConfig::default()
        });
        state.load_path(&path);
        state
    }

    #[test]
    fn load_selects_everything() {
        let dir = tempfile::tempdir().unwrap();
        let state = loaded(&dir);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.status, None);
        assert!(state.export_name.starts_with("A_B_plus0more+x_y_plus0more+"));
    }

    #[test]
    fn refilter_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        assert!(!state.refilter());

        state.input.ranges[0].enabled = true;
        state.input.ranges[0].start = 6;
        state.input.ranges[0].end = 10;
        let name_before = state.export_name.clone();
        assert!(state.refilter());
        assert_eq!(state.visible_indices, vec![1, 2]);
        assert_eq!(state.export_name, name_before);

        state.select_none(true);
        assert!(state.refilter());
        assert!(state.visible_indices.is_empty());
        assert!(!state.can_export());
        assert!(state.export_name.starts_with("unselected+"));
    }

    #[test]
    fn export_state_follows_pending_input_after_refilter() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        assert!(state.can_export());

        // A checkbox toggled during the previous frame.
        state.select_none(false);
        assert!(state.can_export());
        assert!(state.export_name.contains("x_y_plus0more"));

        assert!(state.refilter());
        assert!(!state.can_export());
        assert!(state.export_name.starts_with("A_B_plus0more+unselected+"));
    }

    #[test]
    fn save_to_output_dir_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.input.major.set("B", false);
        state.refilter();
        state.export_name = "out.csv".to_string();

        let path = state.save_to_output_dir().unwrap();
        assert_eq!(path, dir.path().join("outputs").join("out.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\u{feff}大項目,中項目,ページ\nA,x,1\nA,y,5-7\n");
        assert!(matches!(state.status, Some(Status::Info(_))));
    }

    #[test]
    fn missing_columns_keep_a_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "大項目,x\n1,2\n").unwrap();
        let mut state = AppState::new(AppConfig::default());
        state.load_path(&path);

        assert!(state.dataset.is_none());
        let rejected = state.rejected.as_ref().unwrap();
        assert_eq!(rejected.missing, vec!["中項目", "ページ"]);
        assert_eq!(rejected.preview.len(), 1);
        assert!(matches!(state.status, Some(Status::Error(_))));
    }

    #[test]
    fn sample_toggle_loads_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.csv");
        std::fs::write(&sample, CSV).unwrap();
        let mut state = AppState::new(AppConfig {
            sample_csv: Some(sample),
            ..AppConfig::default()
        });

        state.set_use_sample(true);
        assert_eq!(state.total_rows(), 3);
        state.set_use_sample(false);
        assert!(state.dataset.is_none());
        assert!(state.export_name.is_empty());
    }

    #[test]
    fn unreadable_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(AppConfig::default());
        state.load_path(&dir.path().join("absent.csv"));
        assert!(state.dataset.is_none());
        assert!(state.rejected.is_none());
        match &state.status {
            Some(Status::Error(msg)) => assert!(msg.contains("Failed to load")),
            other => panic!("unexpected status: {other:?}"),
        }
    }
}
