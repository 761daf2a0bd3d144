use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::filter::{ColumnFilter, FilterSpec, FilterValue};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – report columns, filters, chart axes
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(output) = &state.output else {
        ui.heading("Report");
        ui.separator();
        ui.label("No files uploaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loops.
    let all_columns = output.combined.columns.clone();
    let selection = output.selection.clone();
    let selected = state.selected_columns();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Report columns ----
            ui.heading("Select Columns for Report");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.set_columns(all_columns.clone());
                }
                if ui.small_button("None").clicked() {
                    state.set_columns(Vec::new());
                }
            });
            for col in &all_columns {
                let mut checked = selected.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    state.toggle_column(col);
                }
            }
            ui.separator();

            let Some(selection) = selection else {
                ui.label("Select at least one column.");
                return;
            };

            // ---- Per-column filters ----
            ui.heading("Filter Data");
            for filter in &selection.filters {
                let Some(current) = selection.filter_values.get(&filter.column) else {
                    continue;
                };
                filter_widget(ui, state, filter, current);
            }
            ui.separator();

            // ---- Chart axes ----
            ui.heading("Select Columns for Bar Chart");
            axis_combo(ui, state, Axis::X, &selection.columns, &selection.x_axis);
            axis_combo(ui, state, Axis::Y, &selection.columns, &selection.y_axis);
        });
}

/// One collapsible filter control; the widget matches the column kind.
fn filter_widget(ui: &mut Ui, state: &mut AppState, filter: &ColumnFilter, current: &FilterValue) {
    let col = &filter.column;
    let header = format!("Filter {col}  ({})", filter.kind);

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(col)
        .default_open(false)
        .show(ui, |ui: &mut Ui| match (&filter.spec, current) {
            (FilterSpec::Range { min, max, step }, FilterValue::Range { lo, hi }) => {
                if filter.spec.is_degenerate() {
                    ui.label(format!("Single value: {min}"));
                    return;
                }
                let (mut lo, mut hi) = (*lo, *hi);
                let lo_changed = ui
                    .add(egui::Slider::new(&mut lo, *min..=*max).step_by(*step).text("min"))
                    .changed();
                let hi_changed = ui
                    .add(egui::Slider::new(&mut hi, *min..=*max).step_by(*step).text("max"))
                    .changed();
                if lo_changed || hi_changed {
                    state.set_filter(col, FilterValue::Range { lo, hi });
                }
            }
            (FilterSpec::Set { options }, FilterValue::Set { excluded }) => {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.set_filter(col, FilterValue::Set { excluded: Default::default() });
                    }
                    if ui.small_button("None").clicked() {
                        state.set_filter(col, FilterValue::Set { excluded: options.clone() });
                    }
                });
                let selected = options.len() - excluded.len();
                ui.label(format!("{selected}/{} selected", options.len()));
                for val in options {
                    let mut checked = !excluded.contains(val);
                    if ui.checkbox(&mut checked, val.label()).changed() {
                        let mut next = excluded.clone();
                        if checked {
                            next.remove(val);
                        } else {
                            next.insert(val.clone());
                        }
                        state.set_filter(col, FilterValue::Set { excluded: next });
                    }
                }
            }
            (FilterSpec::Substring, FilterValue::Substring(pattern)) => {
                let mut text = pattern.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text).hint_text("substring match"),
                );
                if response.changed() {
                    state.set_filter(col, FilterValue::Substring(text));
                }
            }
            _ => {
                ui.label("(filter is being rebuilt)");
            }
        });
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn axis_combo(ui: &mut Ui, state: &mut AppState, axis: Axis, columns: &[String], current: &str) {
    let (id, label) = match axis {
        Axis::X => ("x_axis", "Select X-axis"),
        Axis::Y => ("y_axis", "Select Y-axis"),
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    if ui.selectable_label(current == col.as_str(), col).clicked() {
                        match axis {
                            Axis::X => state.set_x_axis(col),
                            Axis::Y => state.set_y_axis(col),
                        }
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Uploaded files and sheet selection
// ---------------------------------------------------------------------------

/// List uploaded files, each with a sheet dropdown or its ingest error.
pub fn file_list(ui: &mut Ui, state: &mut AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let reports = output.files.clone();

    ui.heading("Uploaded Files and Sheet Selection");
    for (index, report) in reports.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(&report.name);
            if report.sheets.is_empty() {
                if let Some(err) = &report.error {
                    ui.label(RichText::new(err).color(Color32::RED));
                }
                return;
            }
            let current = report.selected_sheet.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt(("sheet", index))
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for sheet in &report.sheets {
                        if ui.selectable_label(current == *sheet, sheet).clicked() {
                            state.select_sheet(index, sheet);
                        }
                    }
                });
            if let Some(err) = &report.error {
                ui.label(RichText::new(err).color(Color32::RED));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.has_uploads(), egui::Button::new("Clear"))
                .clicked()
            {
                state.clear_uploads();
                ui.close_menu();
            }
        });

        ui.separator();

        let filtered = state
            .output
            .as_ref()
            .and_then(|o| o.selection.as_ref().map(|s| (o.combined.len(), s.filtered.len())));
        if let Some((total, visible)) = filtered {
            ui.label(format!("{total} rows combined, {visible} after filters"));
        }

        ui.separator();

        if ui
            .add_enabled(filtered.is_some(), egui::Button::new("Download data as CSV"))
            .clicked()
        {
            save_csv_dialog(state);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Choose Excel files")
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("All spreadsheets", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .pick_files();

    if let Some(paths) = files {
        state.upload_paths(&paths);
    }
}

pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download data as CSV")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
