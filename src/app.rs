use eframe::egui::{self, ScrollArea, Ui};

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SheetViewApp {
    pub state: AppState,
    pub config: ViewerConfig,
}

impl SheetViewApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::default(),
            config,
        }
    }
}

impl eframe::App for SheetViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });
        self.state.refresh(&self.config);

        // ---- Left side panel: columns, filters, chart axes ----
        egui::SidePanel::left("report_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });
        self.state.refresh(&self.config);

        // ---- Central panel: files, tables, chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state, &self.config);
        });
        self.state.refresh(&self.config);
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState, config: &ViewerConfig) {
    if !state.has_uploads() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Please upload Excel files to view and combine their contents  (File → Upload…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            panels::file_list(ui, state);
            ui.separator();

            let Some(output) = &state.output else {
                return;
            };
            table::data_grid(
                ui,
                "combined",
                "Data Preview: Combined Sheets from Multiple Files",
                &output.combined,
                config.preview_rows,
            );

            let Some(selection) = &output.selection else {
                return;
            };
            table::data_grid(
                ui,
                "selected",
                "Selected Data",
                &selection.selected,
                config.preview_rows,
            );
            table::data_grid(
                ui,
                "filtered",
                "Filtered Data",
                &selection.filtered,
                config.preview_rows,
            );

            if let Some(series) = &selection.chart {
                ui.heading(format!("{} by {}", series.y_column, series.x_column));
                plot::bar_chart(ui, series);
            }
        });
}
