/// Process-wide, read-only tuning shared by the UI and the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// A non-numeric column with fewer distinct values than this gets a
    /// multi-select filter instead of a substring box.
    pub categorical_threshold: usize,
    /// Number of slider steps across a numeric column's range.
    pub range_steps: u32,
    /// Rows shown in each data preview grid.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: 10,
            range_steps: 100,
            preview_rows: 500,
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
        }
    }
}
