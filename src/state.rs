use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ViewerConfig;
use crate::data::export::write_csv;
use crate::data::filter::FilterValue;
use crate::data::ingest::UploadedFile;
use crate::data::pipeline::{run, PipelineOutput, Session};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `session` holds what the user provided and chose; `output` is derived from
/// it by the pipeline and rebuilt after every change.
#[derive(Default)]
pub struct AppState {
    pub session: Session,

    /// Result of the last pipeline run (None until files are uploaded).
    pub output: Option<PipelineOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// A user action changed the session since the last run.
    dirty: bool,
}

impl AppState {
    /// Replace the uploaded set with the given files, resetting every choice.
    pub fn set_uploads(&mut self, files: Vec<UploadedFile>) {
        log::info!(
            "Uploaded {} files: {:?}",
            files.len(),
            files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );
        self.session = Session {
            files,
            ..Session::default()
        };
        self.status_message = None;
        self.dirty = true;
    }

    /// Read the given paths and make them the uploaded set. Files that cannot
    /// be read from disk are skipped and reported.
    pub fn upload_paths(&mut self, paths: &[PathBuf]) {
        let mut files = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();
        for path in paths {
            match UploadedFile::from_path(path) {
                Ok(f) => files.push(f),
                Err(e) => {
                    log::error!("Failed to read file: {e:#}");
                    failures.push(format!("{e:#}"));
                }
            }
        }
        self.set_uploads(files);
        if !failures.is_empty() {
            self.status_message = Some(format!("Error: {}", failures.join("; ")));
        }
    }

    pub fn clear_uploads(&mut self) {
        self.set_uploads(Vec::new());
    }

    pub fn has_uploads(&self) -> bool {
        !self.session.files.is_empty()
    }

    /// Choose the sheet for the upload at position `file`.
    pub fn select_sheet(&mut self, file: usize, sheet: &str) {
        self.session
            .sheet_selection
            .insert(file, sheet.to_string());
        self.dirty = true;
    }

    /// The report columns currently in effect.
    pub fn selected_columns(&self) -> Vec<String> {
        match (&self.session.columns, &self.output) {
            (Some(cols), _) => cols.clone(),
            (None, Some(out)) => out.combined.columns.clone(),
            (None, None) => Vec::new(),
        }
    }

    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.session.columns = Some(columns);
        self.dirty = true;
    }

    /// Add or remove one report column, keeping table order.
    pub fn toggle_column(&mut self, column: &str) {
        let mut current = self.selected_columns();
        if let Some(pos) = current.iter().position(|c| c == column) {
            current.remove(pos);
        } else if let Some(out) = &self.output {
            current.push(column.to_string());
            let order = &out.combined.columns;
            current.sort_by_key(|c| order.iter().position(|o| o == c));
        }
        self.set_columns(current);
    }

    pub fn set_filter(&mut self, column: &str, value: FilterValue) {
        self.session.filters.insert(column.to_string(), value);
        self.dirty = true;
    }

    pub fn set_x_axis(&mut self, column: &str) {
        self.session.x_axis = Some(column.to_string());
        self.dirty = true;
    }

    pub fn set_y_axis(&mut self, column: &str) {
        self.session.y_axis = Some(column.to_string());
        self.dirty = true;
    }

    /// Re-run the whole pipeline if anything changed since the last run.
    pub fn refresh(&mut self, config: &ViewerConfig) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        if self.session.files.is_empty() {
            self.output = None;
            return;
        }

        let output = run(&self.session, config);

        // Filters stay as the user edited them; widgets read the resolved
        // values from the output.
        if let Some(sel) = &output.selection {
            self.session.x_axis = Some(sel.x_axis.clone());
            self.session.y_axis = Some(sel.y_axis.clone());
        }
        for (index, report) in output.files.iter().enumerate() {
            if let (None, Some(sheet)) = (&report.error, &report.selected_sheet) {
                self.session.sheet_selection.insert(index, sheet.clone());
            }
        }

        let failed: Vec<&str> = output
            .files
            .iter()
            .filter(|f| f.error.is_some())
            .map(|f| f.name.as_str())
            .collect();
        self.status_message =
            (!failed.is_empty()).then(|| format!("Excluded: {}", failed.join(", ")));

        self.output = Some(output);
    }

    /// Write the filtered table as CSV.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let selection = self
            .output
            .as_ref()
            .and_then(|o| o.selection.as_ref())
            .context("nothing to export: no columns selected")?;
        write_csv(&selection.filtered, path)
            .with_context(|| format!("exporting to {}", path.display()))?;
        self.status_message = Some(format!(
            "Saved {} rows to {}",
            selection.filtered.len(),
            path.display()
        ));
        Ok(())
    }
}
