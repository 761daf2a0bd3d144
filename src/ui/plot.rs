use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::data::chart::BarSeries;

// ---------------------------------------------------------------------------
// Bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the bar chart of the filtered rows.
pub fn bar_chart(ui: &mut Ui, series: &BarSeries) {
    let bars: Vec<Bar> = series
        .bars
        .iter()
        .map(|b| {
            Bar::new(b.position, b.height)
                .width(series.bar_width)
                .name(&b.label)
        })
        .collect();

    if series.skipped > 0 {
        ui.label(format!(
            "{} rows not plotted (missing {} or non-numeric {})",
            series.skipped, series.x_column, series.y_column
        ));
    }

    let chart = BarChart::new(bars)
        .color(Color32::LIGHT_BLUE)
        .name(&series.y_column);

    let labels = series.clone();
    Plot::new("bar_chart")
        .height(360.0)
        .x_axis_label(series.x_column.clone())
        .y_axis_label(series.y_column.clone())
        .x_axis_formatter(move |mark, _range| {
            if labels.categories.is_empty() {
                format!("{}", mark.value)
            } else {
                labels.category_at(mark.value).unwrap_or_default().to_string()
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}
