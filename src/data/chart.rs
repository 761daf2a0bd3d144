use std::collections::HashMap;

use super::model::{CellValue, Table};

/// One bar: where it sits on the x axis and how tall it is.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub position: f64,
    pub height: f64,
    /// X value as text, for hover labels.
    pub label: String,
}

/// Bars for a chart of `y_column` against `x_column`, one per plotted row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub x_column: String,
    pub y_column: String,
    pub bars: Vec<BarMark>,
    /// Axis labels when X is not numeric; bar positions index into this.
    pub categories: Vec<String>,
    pub bar_width: f64,
    /// Rows that produced no bar (missing X or non-numeric Y).
    pub skipped: usize,
}

impl BarSeries {
    /// Axis label for an x position, if it falls on a category.
    pub fn category_at(&self, position: f64) -> Option<&str> {
        if self.categories.is_empty() || position < 0.0 || position.fract() != 0.0 {
            return None;
        }
        self.categories.get(position as usize).map(String::as_str)
    }
}

/// Build the bar series. Rows are plotted individually in row order; repeated
/// X values are not aggregated. Returns `None` if either column is unknown.
pub fn bar_series(table: &Table, x_column: &str, y_column: &str) -> Option<BarSeries> {
    let xi = table.column_index(x_column)?;
    let yi = table.column_index(y_column)?;

    let numeric_x = table
        .column_values(xi)
        .filter(|v| !v.is_null())
        .all(CellValue::is_numeric);

    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut bars = Vec::with_capacity(table.len());
    let mut skipped = 0;

    for row in &table.rows {
        let (x, y) = (&row[xi], &row[yi]);
        let Some(height) = y.as_f64() else {
            skipped += 1;
            continue;
        };
        if x.is_null() {
            skipped += 1;
            continue;
        }

        let label = x.to_string();
        let position = if numeric_x {
            x.as_f64().unwrap_or_default()
        } else {
            let next = categories.len();
            let idx = *category_index.entry(label.clone()).or_insert_with(|| {
                categories.push(label.clone());
                next
            });
            idx as f64
        };

        bars.push(BarMark {
            position,
            height,
            label,
        });
    }

    if skipped > 0 {
        log::debug!("bar chart {y_column} by {x_column}: {skipped} rows not plotted");
    }

    let bar_width = if numeric_x {
        numeric_bar_width(&bars)
    } else {
        0.8
    };

    Some(BarSeries {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        bars,
        categories: if numeric_x { Vec::new() } else { categories },
        bar_width,
        skipped,
    })
}

/// 80% of the smallest gap between distinct x positions.
fn numeric_bar_width(bars: &[BarMark]) -> f64 {
    let mut positions: Vec<f64> = bars.iter().map(|b| b.position).collect();
    positions.sort_by(f64::total_cmp);
    positions.dedup();
    positions
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(None, |acc: Option<f64>, gap| Some(acc.map_or(gap, |a| a.min(gap))))
        .map_or(0.8, |gap| gap * 0.8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn table(rows: Vec<Vec<CellValue>>) -> Table {
        Table::new(vec!["x".into(), "y".into()], rows)
    }

    #[test]
    fn one_bar_per_row_without_aggregation() {
        let t = table(vec![
            vec![s("a"), CellValue::Integer(1)],
            vec![s("b"), CellValue::Integer(2)],
            vec![s("a"), CellValue::Float(3.5)],
        ]);
        let series = bar_series(&t, "x", "y").unwrap();
        assert_eq!(series.bars.len(), 3);
        assert_eq!(series.categories, vec!["a", "b"]);
        let positions: Vec<_> = series.bars.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0.0, 1.0, 0.0]);
        assert_eq!(series.bars[2].height, 3.5);
        assert_eq!(series.category_at(1.0), Some("b"));
        assert_eq!(series.category_at(0.5), None);
    }

    #[test]
    fn numeric_x_uses_values_as_positions() {
        let t = table(vec![
            vec![CellValue::Integer(10), CellValue::Integer(1)],
            vec![CellValue::Integer(20), CellValue::Integer(2)],
            vec![CellValue::Integer(25), CellValue::Integer(2)],
        ]);
        let series = bar_series(&t, "x", "y").unwrap();
        assert!(series.categories.is_empty());
        assert_eq!(series.bars[1].position, 20.0);
        assert_eq!(series.bar_width, 4.0);
    }

    #[test]
    fn unplottable_rows_are_skipped_not_errors() {
        let t = table(vec![
            vec![s("a"), s("tall")],
            vec![CellValue::Null, CellValue::Integer(2)],
            vec![s("c"), CellValue::Integer(3)],
        ]);
        let series = bar_series(&t, "x", "y").unwrap();
        assert_eq!(series.bars.len(), 1);
        assert_eq!(series.skipped, 2);
    }

    #[test]
    fn unknown_axis_yields_nothing() {
        let t = table(vec![]);
        assert!(bar_series(&t, "x", "nope").is_none());
        assert!(bar_series(&t, "x", "y").unwrap().bars.is_empty());
    }
}
