use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};

use super::error::{PipelineError, Result};
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// UploadedFile
// ---------------------------------------------------------------------------

/// A spreadsheet picked by the user: display name plus raw bytes.
/// Bytes are shared so session snapshots clone cheaply.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. Only the bytes are read here; parsing happens
    /// on every pipeline run.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadedFile::new(name, bytes))
    }
}

type Workbook = Sheets<Cursor<Arc<[u8]>>>;

/// Open the workbook; the format (xlsx, xls, xlsb, ods) is sniffed from the content.
fn open(file: &UploadedFile) -> Result<Workbook> {
    open_workbook_auto_from_rs(Cursor::new(Arc::clone(&file.bytes))).map_err(|source| {
        PipelineError::Workbook {
            file: file.name.clone(),
            source,
        }
    })
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// List the sheet names of a workbook, in workbook order.
pub fn sheet_names(file: &UploadedFile) -> Result<Vec<String>> {
    let names = open(file)?.sheet_names();
    if names.is_empty() {
        return Err(PipelineError::NoSheets {
            file: file.name.clone(),
        });
    }
    Ok(names)
}

/// Load one sheet as a table. The first row is the header.
pub fn read_sheet(file: &UploadedFile, sheet: &str) -> Result<Table> {
    let mut workbook = open(file)?;
    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(PipelineError::SheetNotFound {
            file: file.name.clone(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| PipelineError::Workbook {
            file: file.name.clone(),
            source,
        })?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns = header_names(header);
    let body: Vec<Vec<CellValue>> = rows
        .map(|r| r.iter().map(cell_to_value).collect())
        .collect();

    log::debug!(
        "{}#{sheet}: {} columns, {} rows",
        file.name,
        columns.len(),
        body.len()
    );
    Ok(Table::new(columns, body))
}

// -- helpers --

/// Header cells to column names: blanks become `Unnamed: <i>`,
/// repeats get a `.1`, `.2`, … suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());

    for (i, cell) in header.iter().enumerate() {
        let base = match cell_to_value(cell) {
            CellValue::Null => format!("Unnamed: {i}"),
            v => v.to_string(),
        };
        let mut name = base.clone();
        let mut n = 0;
        while names.contains(&name) {
            n += 1;
            name = format!("{base}.{n}");
        }
        names.push(name);
    }
    names
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => float_to_value(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Date(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => float_to_value(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

/// Spreadsheets store every number as a float; whole numbers become integers.
fn float_to_value(f: f64) -> CellValue {
    if f.is_nan() {
        CellValue::Null
    } else if f.fract() == 0.0 && f.abs() < 9.0e15 {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}
