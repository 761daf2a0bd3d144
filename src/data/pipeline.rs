use std::collections::BTreeMap;

use crate::config::ViewerConfig;

use super::chart::{bar_series, BarSeries};
use super::combine::combine_sheets;
use super::error::PipelineError;
use super::filter::{apply_filters, derive_filters, reconcile, ColumnFilter, FilterState};
use super::ingest::{sheet_names, UploadedFile};
use super::model::Table;
use super::select::select_columns;

// ---------------------------------------------------------------------------
// Inputs: an immutable snapshot of the session
// ---------------------------------------------------------------------------

/// Everything the user has provided or chosen. Derived tables are not part of
/// the session; they are rebuilt from it on every run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Uploads in upload order.
    pub files: Vec<UploadedFile>,
    /// Upload position → chosen sheet. Files without an entry use their first
    /// sheet. Keyed by position since two uploads may share a file name.
    pub sheet_selection: BTreeMap<usize, String>,
    /// Report columns. `None` means all columns.
    pub columns: Option<Vec<String>>,
    /// Filter settings from the previous run, edited by the user.
    pub filters: FilterState,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Ingest outcome for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub sheets: Vec<String>,
    pub selected_sheet: Option<String>,
    /// Set when the file was excluded from the combined table.
    pub error: Option<String>,
}

/// Everything downstream of a non-empty column selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub columns: Vec<String>,
    pub selected: Table,
    pub filters: Vec<ColumnFilter>,
    pub filter_values: FilterState,
    pub filtered: Table,
    pub x_axis: String,
    pub y_axis: String,
    pub chart: Option<BarSeries>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub files: Vec<FileReport>,
    pub combined: Table,
    /// `None` when no columns are selected.
    pub selection: Option<Selection>,
}

// ---------------------------------------------------------------------------
// The pipeline
// ---------------------------------------------------------------------------

/// Ingest → combine → select → filter → chart, from scratch.
///
/// A file that cannot be read is reported and left out; nothing here fails
/// the whole run.
pub fn run(session: &Session, config: &ViewerConfig) -> PipelineOutput {
    let mut files: Vec<FileReport> = session
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| ingest_one(file, session.sheet_selection.get(&i)))
        .collect();

    let combined = combine_stage(&session.files, &mut files);
    log::debug!(
        "combined {} rows x {} columns from {} files",
        combined.len(),
        combined.width(),
        files.len()
    );

    let selection = select_stage(&combined, session, config);

    PipelineOutput {
        files,
        combined,
        selection,
    }
}

/// List the file's sheets and resolve which one to load.
fn ingest_one(file: &UploadedFile, chosen: Option<&String>) -> FileReport {
    let mut report = FileReport {
        name: file.name.clone(),
        sheets: Vec::new(),
        selected_sheet: None,
        error: None,
    };

    match sheet_names(file) {
        Ok(sheets) => {
            let sheet = chosen.cloned().or_else(|| sheets.first().cloned());
            if let Some(name) = sheet.as_ref().filter(|s| !sheets.contains(s)) {
                report.error = Some(
                    PipelineError::SheetNotFound {
                        file: file.name.clone(),
                        sheet: name.clone(),
                    }
                    .to_string(),
                );
            }
            report.sheets = sheets;
            report.selected_sheet = sheet;
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    if let Some(err) = &report.error {
        log::warn!("Excluding {}: {err}", file.name);
    }
    report
}

/// Combine the chosen sheets of every file that ingested cleanly. A sheet
/// that fails to load marks its file and the rest are combined without it.
fn combine_stage(uploads: &[UploadedFile], reports: &mut [FileReport]) -> Table {
    let (positions, pairs): (Vec<usize>, Vec<(&UploadedFile, &str)>) = uploads
        .iter()
        .zip(reports.iter())
        .enumerate()
        .filter(|(_, (_, r))| r.error.is_none())
        .filter_map(|(i, (f, r))| r.selected_sheet.as_deref().map(|s| (i, (f, s))))
        .unzip();

    let (table, failures) = combine_sheets(&pairs);
    for (pos, err) in failures {
        log::error!("{err}");
        reports[positions[pos]].error = Some(err.to_string());
    }
    table
}

fn select_stage(combined: &Table, session: &Session, config: &ViewerConfig) -> Option<Selection> {
    // Stale names (columns no longer present) are dropped.
    let columns: Vec<String> = match &session.columns {
        None => combined.columns.clone(),
        Some(chosen) => chosen
            .iter()
            .filter(|c| combined.column_index(c).is_some())
            .cloned()
            .collect(),
    };

    let selected = match select_columns(combined, &columns) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("selection stage skipped: {e}");
            return None;
        }
    };

    let filters = derive_filters(
        &selected,
        config.categorical_threshold,
        config.range_steps,
    );
    let filter_values = reconcile(&filters, &session.filters);
    let filtered = apply_filters(&selected, &filter_values);
    log::debug!("filter kept {} of {} rows", filtered.len(), selected.len());

    let pick_axis = |chosen: &Option<String>| {
        chosen
            .as_ref()
            .filter(|c| columns.contains(c))
            .cloned()
            .unwrap_or_else(|| columns[0].clone())
    };
    let x_axis = pick_axis(&session.x_axis);
    let y_axis = pick_axis(&session.y_axis);
    let chart = bar_series(&filtered, &x_axis, &y_axis);

    Some(Selection {
        columns,
        selected,
        filters,
        filter_values,
        filtered,
        x_axis,
        y_axis,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterValue;
    use crate::data::model::CellValue;
    use crate::tests::{sheet, xlsx_upload, Cell};

    fn upload() -> UploadedFile {
        xlsx_upload(
            "stock.xlsx",
            vec![sheet(
                "Items",
                &["item", "qty"],
                vec![
                    vec![Cell::Str("bolt"), Cell::Num(4.0)],
                    vec![Cell::Str("nut"), Cell::Num(9.0)],
                    vec![Cell::Str("washer"), Cell::Num(1.0)],
                ],
            )],
        )
    }

    #[test]
    fn defaults_resolve_to_everything() {
        let session = Session {
            files: vec![upload()],
            ..Session::default()
        };
        let out = run(&session, &ViewerConfig::default());
        let sel = out.selection.unwrap();

        assert_eq!(out.files[0].selected_sheet.as_deref(), Some("Items"));
        assert_eq!(sel.columns, vec!["item", "qty"]);
        assert_eq!(sel.filtered.len(), 3);
        assert_eq!(sel.x_axis, "item");
        assert_eq!(sel.y_axis, "item");
        assert_eq!(
            sel.filter_values["qty"],
            FilterValue::Range { lo: 1.0, hi: 9.0 }
        );
    }

    #[test]
    fn stale_choices_fall_back() {
        let session = Session {
            files: vec![upload()],
            columns: Some(vec!["gone".into(), "qty".into()]),
            x_axis: Some("gone".into()),
            y_axis: Some("qty".into()),
            ..Session::default()
        };
        let sel = run(&session, &ViewerConfig::default()).selection.unwrap();
        assert_eq!(sel.columns, vec!["qty"]);
        assert_eq!(sel.x_axis, "qty");
        assert_eq!(sel.y_axis, "qty");
    }

    #[test]
    fn unknown_sheet_excludes_the_file() {
        let mut session = Session {
            files: vec![upload()],
            ..Session::default()
        };
        session.sheet_selection.insert(0, "Missing".into());
        let out = run(&session, &ViewerConfig::default());

        assert!(out.combined.is_empty());
        assert_eq!(out.files[0].sheets, vec!["Items"]);
        assert!(out.files[0].error.as_deref().unwrap().contains("Missing"));
        assert!(out.selection.is_none());
    }

    #[test]
    fn same_named_uploads_are_told_apart() {
        let other = xlsx_upload(
            "stock.xlsx",
            vec![sheet(
                "Spares",
                &["item", "qty"],
                vec![vec![Cell::Str("gear"), Cell::Num(2.0)]],
            )],
        );
        let mut session = Session {
            files: vec![upload(), other],
            ..Session::default()
        };
        session.sheet_selection.insert(1, "Spares".into());
        let out = run(&session, &ViewerConfig::default());
        assert_eq!(out.combined.len(), 4);
        assert!(out.files.iter().all(|f| f.error.is_none()));

        // A stale choice for the second upload leaves the first untouched.
        session.sheet_selection.insert(1, "Items".into());
        let out = run(&session, &ViewerConfig::default());
        assert_eq!(out.combined.len(), 3);
        assert!(out.files[0].error.is_none());
        assert!(out.files[1].error.is_some());
    }

    #[test]
    fn chart_follows_filtered_rows() {
        let mut session = Session {
            files: vec![upload()],
            x_axis: Some("item".into()),
            y_axis: Some("qty".into()),
            ..Session::default()
        };
        session
            .filters
            .insert("qty".into(), FilterValue::Range { lo: 2.0, hi: 9.0 });
        let sel = run(&session, &ViewerConfig::default()).selection.unwrap();

        let chart = sel.chart.unwrap();
        assert_eq!(chart.categories, vec!["bolt", "nut"]);
        let heights: Vec<_> = chart.bars.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![4.0, 9.0]);
        assert!(sel
            .filtered
            .column_values(1)
            .all(|v| *v != CellValue::Integer(1)));
    }
}
