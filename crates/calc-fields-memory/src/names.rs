//! Named range table
//!
//! Names are case-insensitive, as in the host applications. Every name refers
//! to one rectangular range on one sheet and follows structural row edits the
//! way a live reference does.

use ahash::AHashMap;

use calc_fields_core::{Error, RangeAddress, Result};

/// A named range definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRange {
    /// The name as it was defined
    pub name: String,
    /// What the name currently refers to
    pub refers_to: RangeAddress,
}

impl NamedRange {
    /// Create a new named range
    pub fn new(name: impl Into<String>, refers_to: RangeAddress) -> Self {
        Self {
            name: name.into(),
            refers_to,
        }
    }
}

/// Collection of named ranges keyed by lowercase name
#[derive(Debug, Default, Clone)]
pub struct NamedRangeTable {
    ranges: AHashMap<String, NamedRange>,
}

impl NamedRangeTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Define a new named range
    ///
    /// Fails if the name is empty or already defined.
    pub fn define(&mut self, range: NamedRange) -> Result<()> {
        if range.name.trim().is_empty() {
            return Err(Error::invalid_argument("named range name is empty"));
        }

        let key = Self::make_key(&range.name);
        if self.ranges.contains_key(&key) {
            return Err(Error::invalid_argument(format!(
                "named range '{}' already exists",
                range.name
            )));
        }

        self.ranges.insert(key, range);
        Ok(())
    }

    /// Get a named range by name
    pub fn get(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.get(&Self::make_key(name))
    }

    /// Remove a named range
    pub fn remove(&mut self, name: &str) -> Option<NamedRange> {
        self.ranges.remove(&Self::make_key(name))
    }

    /// Iterate over all named ranges
    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.values()
    }

    /// Get the number of named ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Follow an insertion of `count` rows before `at_row` on `sheet`
    ///
    /// References below the insertion point move down, references spanning it
    /// grow. With `expand` set, references ending on the row directly above
    /// also grow to include the new rows.
    pub fn insert_rows(&mut self, sheet: i32, at_row: i32, count: i32, expand: bool) {
        for named in self.ranges.values_mut() {
            let r = &mut named.refers_to;
            if r.sheet != sheet {
                continue;
            }
            if r.start_row >= at_row {
                *r = r.offset(count, 0);
            } else if r.end_row >= at_row || (expand && r.end_row == at_row - 1) {
                r.end_row += count;
            }
        }
    }

    /// Follow a removal of rows `at_row..at_row + count` on `sheet`
    ///
    /// References lying entirely inside the removed rows are dropped; their
    /// names are returned.
    pub fn remove_rows(&mut self, sheet: i32, at_row: i32, count: i32) -> Vec<String> {
        let mut dropped = Vec::new();

        self.ranges.retain(|_, named| {
            let r = &mut named.refers_to;
            if r.sheet != sheet {
                return true;
            }
            match shrink_rows(r.start_row, r.end_row, at_row, count) {
                Some((start, end)) => {
                    r.start_row = start;
                    r.end_row = end;
                    true
                }
                None => {
                    dropped.push(named.name.clone());
                    false
                }
            }
        });

        dropped
    }

    /// Follow the insertion of a sheet at `index`
    pub fn sheet_inserted(&mut self, index: i32) {
        for named in self.ranges.values_mut() {
            if named.refers_to.sheet >= index {
                named.refers_to.sheet += 1;
            }
        }
    }

    /// Follow the removal of the sheet at `index`
    ///
    /// Names on that sheet are dropped; their names are returned.
    pub fn sheet_removed(&mut self, index: i32) -> Vec<String> {
        let mut dropped = Vec::new();

        self.ranges.retain(|_, named| {
            let r = &mut named.refers_to;
            if r.sheet == index {
                dropped.push(named.name.clone());
                return false;
            }
            if r.sheet > index {
                r.sheet -= 1;
            }
            true
        });

        dropped
    }
}

/// New `(start, end)` of a row span after rows `at_row..at_row + count` are removed
///
/// Returns `None` when the whole span was removed.
pub(crate) fn shrink_rows(start: i32, end: i32, at_row: i32, count: i32) -> Option<(i32, i32)> {
    let last_removed = at_row + count - 1;

    if end < at_row {
        return Some((start, end));
    }
    if start > last_removed {
        return Some((start - count, end - count));
    }

    let kept_above = (at_row - start).max(0);
    let kept_below = (end - last_removed).max(0);
    if kept_above + kept_below == 0 {
        return None;
    }

    let new_start = start.min(at_row);
    Some((new_start, new_start + kept_above + kept_below - 1))
}
