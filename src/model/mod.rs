//! Core tabular model for the cleaning pipeline.
//!
//! The pipeline operates on a [`Dataset`]: an ordered set of named columns
//! over row-major [`Cell`] storage. Every stage is a transformation of this
//! one structure: columns are added, renamed, reordered or dropped, and
//! rows are filtered, but the shape stays rectangular throughout.
//!
//! Missingness is modeled directly in [`Cell`] rather than with sentinel
//! strings, so "blank", "unmapped" and "unparseable" all collapse into the
//! same state and never produce errors downstream.

use std::collections::HashMap;

// =============================================================================
// Cell
// =============================================================================

/// A single value in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No answer / unmapped / unparseable.
    Missing,
    /// Raw or passthrough text (free responses, postcodes, timestamps).
    Text(String),
    /// A numeric code or scale value.
    Int(i64),
}

impl Cell {
    /// Build a cell from raw export text. Empty and whitespace-only values
    /// become [`Cell::Missing`].
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is a coded cell.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Render for tabular output: missing becomes the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(v) => v.to_string(),
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// An in-memory rectangular table: ordered column names plus row-major cells.
///
/// Column order is significant (it is the output order) and lookups by name
/// go through an index map so per-cell access stays O(1).
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Create an empty dataset with the given column schema.
    pub fn new(columns: Vec<String>) -> Self {
        let index = build_index(&columns);
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Explicit capability check: true only if *every* named column exists.
    /// Validation rules use this to decide whether they apply at all.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has_column(n))
    }

    /// Append a row, padding with missing cells or truncating to the schema
    /// width. Short rows are common in hand-edited exports.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Cell at (row, column name), if the column exists.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Overwrite a cell. Unknown columns are ignored.
    pub fn set(&mut self, row: usize, column: &str, value: Cell) {
        if let Some(idx) = self.column_index(column) {
            if let Some(r) = self.rows.get_mut(row) {
                r[idx] = value;
            }
        }
    }

    /// Apply a function to every cell of a column. Unknown columns are a
    /// no-op, matching the pipeline's tolerance of instrument variants.
    pub fn map_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        if let Some(idx) = self.column_index(column) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
    }

    /// Append a new column filled with `fill`. Returns the column position.
    /// If the column already exists it is overwritten in place.
    pub fn add_column(&mut self, name: &str, fill: Cell) -> usize {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = fill.clone();
            }
            return idx;
        }
        self.columns.push(name.to_string());
        let idx = self.columns.len() - 1;
        self.index.insert(name.to_string(), idx);
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        idx
    }

    /// Insert a new column immediately before `before`, or append if that
    /// anchor column does not exist.
    pub fn insert_column_before(&mut self, name: &str, before: &str, fill: Cell) {
        if self.has_column(name) {
            self.add_column(name, fill);
            return;
        }
        match self.column_index(before) {
            Some(pos) => {
                self.columns.insert(pos, name.to_string());
                for row in &mut self.rows {
                    row.insert(pos, fill.clone());
                }
                self.index = build_index(&self.columns);
            }
            None => {
                self.add_column(name, fill);
            }
        }
    }

    /// Remove a column if present.
    pub fn drop_column(&mut self, name: &str) {
        if let Some(pos) = self.column_index(name) {
            self.columns.remove(pos);
            for row in &mut self.rows {
                row.remove(pos);
            }
            self.index = build_index(&self.columns);
        }
    }

    /// Rename a column if present. Renaming onto an existing name is
    /// rejected to keep the schema unambiguous.
    pub fn rename_column(&mut self, old: &str, new: &str) {
        if old == new || self.has_column(new) {
            return;
        }
        if let Some(pos) = self.column_index(old) {
            self.columns[pos] = new.to_string();
            self.index = build_index(&self.columns);
        }
    }

    /// Reorder columns to match `target`: target columns that exist come
    /// first in target order, remaining columns follow in their current
    /// relative order. Target names not present are silently omitted.
    pub fn reorder_columns(&mut self, target: &[&str]) {
        let mut new_order: Vec<usize> = Vec::with_capacity(self.columns.len());
        for name in target {
            if let Some(idx) = self.column_index(name) {
                new_order.push(idx);
            }
        }
        for (idx, name) in self.columns.iter().enumerate() {
            if !target.contains(&name.as_str()) {
                new_order.push(idx);
            }
        }
        debug_assert_eq!(new_order.len(), self.columns.len());

        self.columns = new_order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            let reordered: Vec<Cell> = new_order.iter().map(|&i| row[i].clone()).collect();
            *row = reordered;
        }
        self.index = build_index(&self.columns);
    }

    /// Keep only the rows whose indices are *not* in `drop`. Indices refer
    /// to the current row order.
    pub fn drop_rows(&mut self, drop: &[usize]) {
        if drop.is_empty() {
            return;
        }
        let drop_set: std::collections::HashSet<usize> = drop.iter().copied().collect();
        let mut i = 0;
        self.rows.retain(|_| {
            let keep = !drop_set.contains(&i);
            i += 1;
            keep
        });
    }

    /// Row indices for which `predicate` returns true.
    pub fn select_rows<F>(&self, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(usize) -> bool,
    {
        (0..self.rows.len()).filter(|&i| predicate(i)).collect()
    }
}

fn build_index(columns: &[String]) -> HashMap<String, usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.clone(), i))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut ds = Dataset::new(vec!["ID".into(), "A".into(), "B".into()]);
        ds.push_row(vec![
            Cell::Text("1".into()),
            Cell::Text("x".into()),
            Cell::Int(5),
        ]);
        ds.push_row(vec![Cell::Text("2".into()), Cell::Missing, Cell::Int(7)]);
        ds
    }

    #[test]
    fn test_cell_from_raw() {
        assert_eq!(Cell::from_raw(""), Cell::Missing);
        assert_eq!(Cell::from_raw("   "), Cell::Missing);
        assert_eq!(Cell::from_raw("\t\n"), Cell::Missing);
        assert_eq!(Cell::from_raw("abc"), Cell::Text("abc".into()));
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut ds = sample();
        ds.push_row(vec![Cell::Text("3".into())]);
        assert_eq!(ds.get(2, "B"), Some(&Cell::Missing));
    }

    #[test]
    fn test_rename_and_lookup() {
        let mut ds = sample();
        ds.rename_column("A", "S1");
        assert!(ds.has_column("S1"));
        assert!(!ds.has_column("A"));
        assert_eq!(ds.get(0, "S1"), Some(&Cell::Text("x".into())));
    }

    #[test]
    fn test_rename_onto_existing_is_rejected() {
        let mut ds = sample();
        ds.rename_column("A", "B");
        assert!(ds.has_column("A"));
        assert_eq!(ds.n_columns(), 3);
    }

    #[test]
    fn test_reorder_omits_missing_and_appends_extras() {
        let mut ds = sample();
        ds.reorder_columns(&["B", "Nope", "ID"]);
        assert_eq!(ds.columns(), &["B", "ID", "A"]);
        assert_eq!(ds.get(0, "B"), Some(&Cell::Int(5)));
        assert_eq!(ds.get(0, "A"), Some(&Cell::Text("x".into())));
    }

    #[test]
    fn test_insert_column_before() {
        let mut ds = sample();
        ds.insert_column_before("Wave", "B", Cell::Int(1));
        assert_eq!(ds.columns(), &["ID", "A", "Wave", "B"]);
        assert_eq!(ds.get(1, "Wave"), Some(&Cell::Int(1)));
    }

    #[test]
    fn test_insert_column_before_missing_anchor_appends() {
        let mut ds = sample();
        ds.insert_column_before("Wave", "Nope", Cell::Int(1));
        assert_eq!(ds.columns().last().map(String::as_str), Some("Wave"));
    }

    #[test]
    fn test_drop_rows() {
        let mut ds = sample();
        ds.drop_rows(&[0]);
        assert_eq!(ds.n_rows(), 1);
        assert_eq!(ds.get(0, "ID"), Some(&Cell::Text("2".into())));
    }

    #[test]
    fn test_has_columns_capability_check() {
        let ds = sample();
        assert!(ds.has_columns(&["ID", "A"]));
        assert!(!ds.has_columns(&["ID", "Nope"]));
    }
}
