use std::collections::BTreeSet;

use super::model::{CellValue, ColumnKind, Table};

/// Per-column statistics the filter controls are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    /// Distinct values, including `Null` when the column has gaps.
    pub distinct: BTreeSet<CellValue>,
    /// Every non-null value is a number (and there is at least one).
    pub all_numeric: bool,
    /// Observed numeric bounds; `None` unless `all_numeric`.
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnProfile {
    pub fn of(values: impl IntoIterator<Item = CellValue>) -> Self {
        let mut distinct = BTreeSet::new();
        let mut non_null = 0;
        let mut all_numeric = true;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            if !v.is_null() {
                non_null += 1;
                match v.as_f64() {
                    Some(x) => {
                        min = min.min(x);
                        max = max.max(x);
                    }
                    None => all_numeric = false,
                }
            }
            distinct.insert(v);
        }

        let all_numeric = all_numeric && non_null > 0;
        ColumnProfile {
            distinct,
            all_numeric,
            min: all_numeric.then_some(min),
            max: all_numeric.then_some(max),
        }
    }

    /// Profile column `idx` of `table`.
    pub fn of_column(table: &Table, idx: usize) -> Self {
        Self::of(table.column_values(idx).cloned())
    }

    /// Number of distinct non-null values.
    pub fn cardinality(&self) -> usize {
        self.distinct.iter().filter(|v| !v.is_null()).count()
    }
}

/// Classify a column. Numeric wins over categorical, so a number column with
/// only a handful of distinct values still gets a range filter.
pub fn classify(profile: &ColumnProfile, categorical_threshold: usize) -> ColumnKind {
    if profile.all_numeric {
        ColumnKind::Numeric
    } else if profile.cardinality() < categorical_threshold {
        ColumnKind::Categorical
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|s| CellValue::String(s.to_string())).collect()
    }

    #[test]
    fn numbers_with_gaps_are_numeric() {
        let p = ColumnProfile::of(vec![
            CellValue::Integer(4),
            CellValue::Null,
            CellValue::Float(-1.5),
        ]);
        assert!(p.all_numeric);
        assert_eq!(p.min, Some(-1.5));
        assert_eq!(p.max, Some(4.0));
        assert_eq!(classify(&p, 10), ColumnKind::Numeric);
    }

    #[test]
    fn low_cardinality_numbers_stay_numeric() {
        let p = ColumnProfile::of(vec![CellValue::Integer(1); 20]);
        assert_eq!(p.cardinality(), 1);
        assert_eq!(classify(&p, 10), ColumnKind::Numeric);
    }

    #[test]
    fn few_distinct_strings_are_categorical() {
        let p = ColumnProfile::of(strings(&["x", "y", "z", "x", "y"]));
        assert_eq!(classify(&p, 10), ColumnKind::Categorical);
    }

    #[test]
    fn threshold_is_exclusive() {
        let ten: Vec<String> = (0..10).map(|i| format!("v{i}")).collect();
        let refs: Vec<&str> = ten.iter().map(String::as_str).collect();
        let p = ColumnProfile::of(strings(&refs));
        assert_eq!(classify(&p, 10), ColumnKind::Text);
        assert_eq!(classify(&p, 11), ColumnKind::Categorical);
    }

    #[test]
    fn null_does_not_count_towards_cardinality() {
        let mut values = strings(&["a", "b"]);
        values.push(CellValue::Null);
        let p = ColumnProfile::of(values);
        assert_eq!(p.cardinality(), 2);
        assert!(p.distinct.contains(&CellValue::Null));
    }

    #[test]
    fn mixed_and_empty_columns_are_not_numeric() {
        let mixed = ColumnProfile::of(vec![CellValue::Integer(1), CellValue::String("a".into())]);
        assert!(!mixed.all_numeric);
        assert_eq!(classify(&mixed, 10), ColumnKind::Categorical);

        let empty = ColumnProfile::of(vec![CellValue::Null, CellValue::Null]);
        assert!(!empty.all_numeric);
        assert_eq!(classify(&empty, 10), ColumnKind::Categorical);

        let bools = ColumnProfile::of(vec![CellValue::Bool(true), CellValue::Bool(false)]);
        assert_eq!(classify(&bools, 10), ColumnKind::Categorical);
    }
}
