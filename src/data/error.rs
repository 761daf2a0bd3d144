use thiserror::Error;

/// Errors raised by the data pipeline.
///
/// None of these are fatal to the session: ingest failures exclude one file,
/// selection errors leave the downstream sections unrendered.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{file}: not a readable spreadsheet: {source}")]
    Workbook {
        file: String,
        #[source]
        source: calamine::Error,
    },

    #[error("{file}: workbook contains no sheets")]
    NoSheets { file: String },

    #[error("{file}: sheet '{sheet}' not found")]
    SheetNotFound { file: String, sheet: String },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("no columns selected")]
    EmptySelection,

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
