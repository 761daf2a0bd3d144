mod app;
mod config;
mod data;
mod state;
mod ui;


use app::SheetViewApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Excel File Viewer and Graph Creator",
        options,
        Box::new(|_cc| Ok(Box::new(SheetViewApp::new(config)))),
    )
}
