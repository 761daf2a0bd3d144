use super::error::{PipelineError, Result};
use super::model::Table;

/// Project the table onto `columns`, in the requested order.
///
/// Row order and values are untouched. Requesting every column in table
/// order returns a plain copy.
pub fn select_columns(table: &Table, columns: &[String]) -> Result<Table> {
    if columns.is_empty() {
        return Err(PipelineError::EmptySelection);
    }
    if columns == table.columns.as_slice() {
        return Ok(table.clone());
    }

    let indices = columns
        .iter()
        .map(|c| {
            table
                .column_index(c)
                .ok_or_else(|| PipelineError::UnknownColumn(c.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(Table {
        columns: columns.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn sample() -> Table {
        Table::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![
                    CellValue::Integer(1),
                    CellValue::String("p".into()),
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::Integer(2),
                    CellValue::String("q".into()),
                    CellValue::Null,
                ],
            ],
        )
    }

    #[test]
    fn output_follows_requested_order() {
        let out = select_columns(&sample(), &["C".into(), "A".into()]).unwrap();
        assert_eq!(out.columns, vec!["C", "A"]);
        assert_eq!(out.rows[0], vec![CellValue::Bool(true), CellValue::Integer(1)]);
        assert_eq!(out.rows[1], vec![CellValue::Null, CellValue::Integer(2)]);
    }

    #[test]
    fn full_selection_is_identity() {
        let t = sample();
        let out = select_columns(&t, &t.columns).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn empty_or_unknown_selection_is_an_error() {
        assert!(matches!(
            select_columns(&sample(), &[]),
            Err(PipelineError::EmptySelection)
        ));
        assert!(matches!(
            select_columns(&sample(), &["Z".into()]),
            Err(PipelineError::UnknownColumn(c)) if c == "Z"
        ));
    }
}
