//! Sparse cell storage
//!
//! Only non-empty cells are stored, in a row-major
//! `BTreeMap<row, BTreeMap<column, CellContent>>` so row shifts and ordered
//! scans stay cheap.

use std::collections::BTreeMap;

use calc_fields_core::CellContent;

/// Sparse row-based storage for one sheet
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CellStorage {
    rows: BTreeMap<i32, BTreeMap<i32, CellContent>>,
}

impl CellStorage {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell's content, if stored
    pub fn get(&self, row: i32, col: i32) -> Option<&CellContent> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Set a cell's content
    ///
    /// Storing [`CellContent::Empty`] removes the cell.
    pub fn set(&mut self, row: i32, col: i32, content: CellContent) {
        if content.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, content);
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: i32, col: i32) -> Option<CellContent> {
        let result = self.rows.get_mut(&row).and_then(|r| r.remove(&col));

        // Clean up empty rows
        if let Some(row_map) = self.rows.get(&row) {
            if row_map.is_empty() {
                self.rows.remove(&row);
            }
        }

        result
    }

    /// Whether the cell holds no content
    pub fn is_blank(&self, row: i32, col: i32) -> bool {
        self.get(row, col).is_none()
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bounds of used cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = i32::MAX;
        let mut max_col = 0;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &CellContent)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, content)| (row, col, content)))
    }

    /// Whether any cell in `row` between `first_col` and `last_col` holds content
    pub fn row_has_content(&self, row: i32, first_col: i32, last_col: i32) -> bool {
        if first_col > last_col {
            return false;
        }
        self.rows
            .get(&row)
            .map_or(false, |cols| cols.range(first_col..=last_col).next().is_some())
    }

    /// Whether any cell in `col` between `first_row` and `last_row` holds content
    pub fn column_has_content(&self, col: i32, first_row: i32, last_row: i32) -> bool {
        if first_row > last_row {
            return false;
        }
        self.rows
            .range(first_row..=last_row)
            .any(|(_, cols)| cols.contains_key(&col))
    }

    /// Shift every row at or below `at_row` down by `count`
    pub fn insert_rows(&mut self, at_row: i32, count: i32) {
        let moved = self.rows.split_off(&at_row);
        for (row, cols) in moved {
            self.rows.insert(row + count, cols);
        }
    }

    /// Drop rows `at_row..at_row + count` and shift the rows below up
    pub fn remove_rows(&mut self, at_row: i32, count: i32) {
        let mut tail = self.rows.split_off(&at_row);
        let below = tail.split_off(&(at_row + count));
        for (row, cols) in below {
            self.rows.insert(row - count, cols);
        }
    }
}
