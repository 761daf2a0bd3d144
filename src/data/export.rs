use std::path::Path;

use super::error::{PipelineError, Result};
use super::model::Table;

/// Name offered for the downloaded file.
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Serialise the table as UTF-8 CSV: a header row of column names, then one
/// record per row. Missing values become empty fields.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}

/// Write the CSV payload to `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(table)?;
    std::fs::write(path, bytes)?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn sample() -> Table {
        Table::new(
            vec!["name".into(), "qty".into(), "price".into()],
            vec![
                vec![
                    CellValue::String("bolt, hex".into()),
                    CellValue::Integer(3),
                    CellValue::Float(0.25),
                ],
                vec![
                    CellValue::String("washer".into()),
                    CellValue::Null,
                    CellValue::Float(1.5),
                ],
            ],
        )
    }

    #[test]
    fn parsing_the_export_reproduces_the_table() {
        let table = sample();
        let bytes = to_csv_bytes(&table).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, table.columns);

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(records.len(), table.len());
        for (record, row) in records.iter().zip(&table.rows) {
            let expected: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            assert_eq!(record, &expected);
        }
        assert_eq!(records[1][1], "");
    }

    #[test]
    fn empty_table_still_has_header() {
        let table = Table::new(vec!["A".into(), "B".into()], Vec::new());
        let text = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(text, "A,B\n");
    }

    #[test]
    fn write_csv_creates_the_file() {
        let dir = std::env::temp_dir().join(format!("sheetview-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(EXPORT_FILE_NAME);

        write_csv(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("name,qty,price\n\"bolt, hex\",3,0.25\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
