use super::error::PipelineError;
use super::ingest::{read_sheet, UploadedFile};
use super::model::{CellValue, Table};

/// Load the chosen sheet of every file and stack them into one table.
///
/// A pair whose sheet cannot be read is left out and returned with its
/// position in `selections`; the remaining pairs are still combined.
pub fn combine_sheets(
    selections: &[(&UploadedFile, &str)],
) -> (Table, Vec<(usize, PipelineError)>) {
    let mut tables = Vec::with_capacity(selections.len());
    let mut failures = Vec::new();
    for (pos, (file, sheet)) in selections.iter().enumerate() {
        match read_sheet(file, sheet) {
            Ok(table) => tables.push(table),
            Err(e) => failures.push((pos, e)),
        }
    }
    (concat_tables(tables), failures)
}

/// Concatenate tables by row, aligning columns by name.
///
/// The column set is the union in first-appearance order. Cells for columns
/// a table lacks are `Null`. Rows keep input order; nothing is deduplicated.
pub fn concat_tables(tables: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for t in &tables {
        for c in &t.columns {
            if !columns.contains(c) {
                columns.push(c.clone());
            }
        }
    }

    let total: usize = tables.iter().map(Table::len).sum();
    let mut rows = Vec::with_capacity(total);

    for t in tables {
        // Position of each output column in this table, if present.
        let mapping: Vec<Option<usize>> = columns.iter().map(|c| t.column_index(c)).collect();
        for row in t.rows {
            rows.push(
                mapping
                    .iter()
                    .map(|src| src.map_or(CellValue::Null, |i| row[i].clone()))
                    .collect(),
            );
        }
    }

    Table { columns, rows }
}
