use std::collections::{BTreeMap, BTreeSet};

use super::kind::{classify, ColumnProfile};
use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Filter controls derived from the data
// ---------------------------------------------------------------------------

/// The control a column gets, derived from its kind and observed values.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Continuous range over `[min, max]`. `step == 0.0` when `min == max`.
    Range { min: f64, max: f64, step: f64 },
    /// Multi-select over the distinct values (including `Null` if present).
    Set { options: BTreeSet<CellValue> },
    /// Case-insensitive substring match.
    Substring,
}

impl FilterSpec {
    /// The unconstrained setting for this control.
    pub fn default_value(&self) -> FilterValue {
        match self {
            FilterSpec::Range { min, max, .. } => FilterValue::Range { lo: *min, hi: *max },
            FilterSpec::Set { .. } => FilterValue::Set {
                excluded: BTreeSet::new(),
            },
            FilterSpec::Substring => FilterValue::Substring(String::new()),
        }
    }

    /// Carry a previous setting over to this control, or fall back to the default.
    ///
    /// Ranges are clamped into the current bounds. Sets keep only the
    /// deselections that are still options, so new values start selected.
    /// Patterns are kept. A setting of another shape is dropped.
    pub fn reconcile(&self, previous: Option<&FilterValue>) -> FilterValue {
        match (self, previous) {
            (FilterSpec::Range { min, max, .. }, Some(FilterValue::Range { lo, hi })) => {
                let lo = lo.clamp(*min, *max);
                let hi = hi.clamp(*min, *max);
                FilterValue::Range {
                    lo: lo.min(hi),
                    hi: lo.max(hi),
                }
            }
            (FilterSpec::Set { options }, Some(FilterValue::Set { excluded })) => {
                FilterValue::Set {
                    excluded: excluded.intersection(options).cloned().collect(),
                }
            }
            (FilterSpec::Substring, Some(FilterValue::Substring(p))) => {
                FilterValue::Substring(p.clone())
            }
            _ => self.default_value(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, FilterSpec::Range { step, .. } if *step == 0.0)
    }
}

/// A column, its inferred kind and the control built for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    pub column: String,
    pub kind: ColumnKind,
    pub spec: FilterSpec,
}

/// Build one filter control per column of `table`, in column order.
pub fn derive_filters(
    table: &Table,
    categorical_threshold: usize,
    range_steps: u32,
) -> Vec<ColumnFilter> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let profile = ColumnProfile::of_column(table, idx);
            let kind = classify(&profile, categorical_threshold);
            let spec = match (kind, profile.min, profile.max) {
                (ColumnKind::Numeric, Some(min), Some(max)) => {
                    let span = max - min;
                    let step = if span > 0.0 {
                        span / f64::from(range_steps.max(1))
                    } else {
                        0.0
                    };
                    FilterSpec::Range { min, max, step }
                }
                (ColumnKind::Text, _, _) => FilterSpec::Substring,
                _ => FilterSpec::Set {
                    options: profile.distinct,
                },
            };
            ColumnFilter {
                column: column.clone(),
                kind,
                spec,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filter values: what the user has chosen per column
// ---------------------------------------------------------------------------

/// The user's current setting for one column's control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Inclusive on both ends.
    Range { lo: f64, hi: f64 },
    /// Deselected values. Everything else passes; excluding every option
    /// keeps nothing.
    Set { excluded: BTreeSet<CellValue> },
    /// Empty pattern means no constraint.
    Substring(String),
}

impl FilterValue {
    /// Whether a single cell satisfies this setting.
    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            FilterValue::Range { lo, hi } => value
                .as_f64()
                .is_some_and(|v| *lo <= v && v <= *hi),
            FilterValue::Set { excluded } => !excluded.contains(value),
            FilterValue::Substring(pattern) => {
                if pattern.is_empty() {
                    return true;
                }
                if value.is_null() {
                    return false;
                }
                value
                    .to_string()
                    .to_lowercase()
                    .contains(&pattern.to_lowercase())
            }
        }
    }
}

/// Per-column filter settings: column_name → value.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, FilterValue>;

/// Resolve a full [`FilterState`] for `filters`, keeping what is still valid
/// from `previous`.
pub fn reconcile(filters: &[ColumnFilter], previous: &FilterState) -> FilterState {
    filters
        .iter()
        .map(|f| (f.column.clone(), f.spec.reconcile(previous.get(&f.column))))
        .collect()
}

/// Return indices of rows that pass every active filter (logical AND).
///
/// Filters naming columns the table does not have are ignored.
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(usize, &FilterValue)> = filters
        .iter()
        .filter_map(|(col, value)| table.column_index(col).map(|idx| (idx, value)))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| active.iter().all(|(idx, value)| value.matches(&row[*idx])))
        .map(|(i, _)| i)
        .collect()
}

/// The rows of `table` passing every filter, in table order.
pub fn apply_filters(table: &Table, filters: &FilterState) -> Table {
    table.take_rows(&filtered_indices(table, filters))
}
