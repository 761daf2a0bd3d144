use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

/// Render a titled, scrollable grid of the first `max_rows` rows of `table`.
pub fn data_grid(ui: &mut Ui, id: &str, title: &str, table: &Table, max_rows: usize) {
    ui.heading(title);
    if table.width() == 0 {
        ui.label("No data.");
        return;
    }

    let shown = table.len().min(max_rows);
    if table.is_empty() {
        ui.label(RichText::new("no rows").weak());
    } else if shown < table.len() {
        ui.label(
            RichText::new(format!("showing {shown} of {} rows", table.len())).weak(),
        );
    } else {
        ui.label(RichText::new(format!("{} rows", table.len())).weak());
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(240.0)
            .columns(Column::auto().at_least(60.0).clip(true), table.width())
            .header(HEADER_HEIGHT, |mut header| {
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, shown, |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.label());
                        });
                    }
                });
            });
    });
    ui.add_space(8.0);
}
