//! In-memory document session

use std::fmt;

use tracing::{debug, warn};

use calc_fields_core::{
    CellAccess, CellAddress, CellContent, Error, FillDirection, FillMode, GridEditor,
    MergeControl, NamedRangeSource, RangeAddress, Result, SelectionControl, SheetControl,
    SheetSettings,
};

use crate::names::{NamedRange, NamedRangeTable};
use crate::sheet::MemorySheet;

/// Session operations that can be made to fail with [`MemoryDocument::fail_on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOp {
    SetCell,
    InsertRows,
    RemoveRows,
    CopyRange,
    MoveRange,
    FillSeries,
    SetMerge,
    Select,
    AddNamedRange,
    RemoveNamedRange,
    SetExpandReferences,
    InsertSheet,
    RemoveSheet,
}

impl fmt::Display for SessionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A document held entirely in memory
///
/// Implements every collaborator trait, so the editing components run against
/// it exactly as they would against a live host session.
///
/// # Example
///
/// ```rust
/// use calc_fields_core::{CellAccess, CellAddress, GridEditor};
/// use calc_fields_memory::MemoryDocument;
///
/// let mut doc = MemoryDocument::with_sheet("Sheet1");
/// doc.set_cell_string(CellAddress::new(0, 0, 1), "moved").unwrap();
/// doc.insert_rows(0, 0, 2).unwrap();
///
/// assert_eq!(doc.get(CellAddress::new(0, 0, 3)).to_string(), "moved");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    sheets: Vec<MemorySheet>,
    names: NamedRangeTable,
    selection: Vec<RangeAddress>,
    expand_references: bool,
    disposed: bool,
    failing: Vec<SessionOp>,
}

impl MemoryDocument {
    /// Create a new document with no sheets
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            names: NamedRangeTable::new(),
            selection: Vec::new(),
            expand_references: false,
            disposed: false,
            failing: Vec::new(),
        }
    }

    /// Create a new document with one sheet
    pub fn with_sheet<S: Into<String>>(name: S) -> Self {
        let mut doc = Self::new();
        doc.add_sheet(name);
        doc
    }

    /// Append a sheet, returning its index
    pub fn add_sheet<S: Into<String>>(&mut self, name: S) -> i32 {
        self.sheets.push(MemorySheet::new(name));
        self.sheets.len() as i32 - 1
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: i32) -> Option<&MemorySheet> {
        usize::try_from(index).ok().and_then(|i| self.sheets.get(i))
    }

    /// Find a sheet index by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<i32> {
        self.sheets
            .iter()
            .position(|s| s.name().eq_ignore_ascii_case(name))
            .map(|i| i as i32)
    }

    /// Iterate over all sheets
    pub fn sheets(&self) -> impl Iterator<Item = &MemorySheet> {
        self.sheets.iter()
    }

    /// Content of a cell; empty for unknown sheets or positions
    pub fn get(&self, at: CellAddress) -> CellContent {
        match self.sheet(at.sheet) {
            Some(sheet) => sheet.content_at(at.row, at.column),
            None => CellContent::Empty,
        }
    }

    /// Store any content in a cell
    pub fn set(&mut self, at: CellAddress, content: CellContent) -> Result<()> {
        self.check(SessionOp::SetCell)?;
        check_cell(at)?;
        self.sheet_mut(at.sheet)?
            .cells_mut()
            .set(at.row, at.column, content);
        Ok(())
    }

    /// Merge a range without going through the session checks
    pub fn merge(&mut self, range: RangeAddress) -> Result<()> {
        check_range(range)?;
        self.sheet_mut(range.sheet)?.merge_cells(range)
    }

    /// Merged regions of a sheet (empty for unknown sheets)
    pub fn merged_regions(&self, sheet: i32) -> &[RangeAddress] {
        self.sheet(sheet)
            .map(|s| s.merged_regions())
            .unwrap_or(&[])
    }

    /// Define a named range referring to `range`
    pub fn define_name(&mut self, name: &str, range: RangeAddress) -> Result<()> {
        check_range(range)?;
        self.sheet_ref(range.sheet)?;
        self.names.define(NamedRange::new(name, range))
    }

    /// Range a name currently refers to
    pub fn named_range(&self, name: &str) -> Option<RangeAddress> {
        self.names.get(name).map(|n| n.refers_to)
    }

    /// Iterate over all named ranges
    pub fn names(&self) -> impl Iterator<Item = &NamedRange> {
        self.names.iter()
    }

    /// Close the session; every later call fails with
    /// [`Error::CollaboratorUnavailable`]
    pub fn dispose(&mut self) {
        debug!("disposing memory document");
        self.disposed = true;
    }

    /// Check if the session was disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Make every call of `op` fail until [`clear_failures`](Self::clear_failures)
    pub fn fail_on(&mut self, op: SessionOp) {
        if !self.failing.contains(&op) {
            self.failing.push(op);
        }
    }

    /// Remove all failures injected with [`fail_on`](Self::fail_on)
    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    fn live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::unavailable("document session is disposed"));
        }
        Ok(())
    }

    fn check(&self, op: SessionOp) -> Result<()> {
        self.live()?;
        if self.failing.contains(&op) {
            return Err(Error::unavailable(format!("{} rejected by the host", op)));
        }
        Ok(())
    }

    fn sheet_ref(&self, index: i32) -> Result<&MemorySheet> {
        self.sheet(index)
            .ok_or_else(|| Error::not_found(format!("sheet {}", index)))
    }

    fn sheet_mut(&mut self, index: i32) -> Result<&mut MemorySheet> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.sheets.get_mut(i))
            .ok_or_else(|| Error::not_found(format!("sheet {}", index)))
    }

    /// Contents of `src` as offsets from its top-left
    fn collect(&self, src: RangeAddress) -> Result<Vec<(i32, i32, CellContent)>> {
        let sheet = self.sheet_ref(src.sheet)?;
        Ok(src
            .cells()
            .map(|at| {
                (
                    at.row - src.start_row,
                    at.column - src.start_column,
                    sheet.content_at(at.row, at.column),
                )
            })
            .collect())
    }

    fn paste(&mut self, dst: CellAddress, block: Vec<(i32, i32, CellContent)>) -> Result<()> {
        let cells = self.sheet_mut(dst.sheet)?.cells_mut();
        for (dr, dc, content) in block {
            cells.set(dst.row + dr, dst.column + dc, content);
        }
        Ok(())
    }

    /// Rebind every sheet's merged regions to its current position
    fn reindex(&mut self) {
        for (index, sheet) in self.sheets.iter_mut().enumerate() {
            sheet.set_index(index as i32);
        }
    }

    /// Resolve a reference such as `$A$5:$C$5`, `Sheet2!B2` or `$Sheet2.B2`
    fn resolve_reference(&self, content: &str, position: CellAddress) -> Result<RangeAddress> {
        let content = content.trim().trim_start_matches('=');
        let (sheet, reference) = match content.rsplit_once('!').or_else(|| content.rsplit_once('.'))
        {
            Some((sheet_name, reference)) => {
                let sheet_name = sheet_name.trim_start_matches('$').trim_matches('\'');
                let sheet = self
                    .sheet_index(sheet_name)
                    .ok_or_else(|| Error::not_found(format!("sheet '{}'", sheet_name)))?;
                (sheet, reference)
            }
            None => (position.sheet, content),
        };
        RangeAddress::parse(sheet, reference)
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn check_cell(at: CellAddress) -> Result<()> {
    if !at.is_valid() {
        return Err(Error::invalid_argument(format!(
            "negative cell index {:?}",
            at
        )));
    }
    Ok(())
}

fn check_range(range: RangeAddress) -> Result<()> {
    if !range.is_valid() {
        return Err(Error::invalid_argument(format!(
            "negative range index {:?}",
            range
        )));
    }
    Ok(())
}

fn check_rows(at_row: i32, count: i32) -> Result<()> {
    if at_row < 0 {
        return Err(Error::invalid_argument(format!("negative row {}", at_row)));
    }
    if count <= 0 {
        return Err(Error::invalid_argument(format!(
            "row count must be positive, got {}",
            count
        )));
    }
    Ok(())
}

fn series_step(source: &CellContent, mode: FillMode, i: i32) -> CellContent {
    match (mode, source) {
        (FillMode::Linear { step }, CellContent::Number(n)) => {
            CellContent::Number(n + step * i as f64)
        }
        _ => source.clone(),
    }
}

impl CellAccess for MemoryDocument {
    fn sheet_count(&self) -> Result<i32> {
        self.live()?;
        Ok(self.sheets.len() as i32)
    }

    fn find_sheet(&self, name: &str) -> Result<Option<i32>> {
        self.live()?;
        Ok(self.sheet_index(name))
    }

    fn cell(&self, at: CellAddress) -> Result<CellContent> {
        self.live()?;
        check_cell(at)?;
        Ok(self.sheet_ref(at.sheet)?.content_at(at.row, at.column))
    }

    fn set_cell_string(&mut self, at: CellAddress, value: &str) -> Result<()> {
        // An empty string clears the cell
        if value.is_empty() {
            return self.set(at, CellContent::Empty);
        }
        self.set(at, CellContent::string(value))
    }

    fn set_cell_value(&mut self, at: CellAddress, value: f64) -> Result<()> {
        self.set(at, CellContent::Number(value))
    }

    fn set_cell_formula(&mut self, at: CellAddress, formula: &str) -> Result<()> {
        self.set(at, CellContent::formula(formula))
    }
}

impl GridEditor for MemoryDocument {
    fn insert_rows(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()> {
        self.check(SessionOp::InsertRows)?;
        check_rows(at_row, count)?;
        self.sheet_mut(sheet)?.insert_rows(at_row, count);
        self.names
            .insert_rows(sheet, at_row, count, self.expand_references);

        debug!(sheet, at_row, count, "inserted rows");
        Ok(())
    }

    fn remove_rows(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()> {
        self.check(SessionOp::RemoveRows)?;
        check_rows(at_row, count)?;
        self.sheet_mut(sheet)?.remove_rows(at_row, count);
        for name in self.names.remove_rows(sheet, at_row, count) {
            warn!(%name, "named range removed with its rows");
        }

        debug!(sheet, at_row, count, "removed rows");
        Ok(())
    }

    fn copy_range(&mut self, dst: CellAddress, src: RangeAddress) -> Result<()> {
        self.check(SessionOp::CopyRange)?;
        check_range(src)?;
        check_cell(dst)?;
        let block = self.collect(src)?;
        self.paste(dst, block)
    }

    fn move_range(&mut self, dst: CellAddress, src: RangeAddress) -> Result<()> {
        self.check(SessionOp::MoveRange)?;
        check_range(src)?;
        check_cell(dst)?;
        self.sheet_ref(dst.sheet)?;

        let block = self.collect(src)?;
        let cells = self.sheet_mut(src.sheet)?.cells_mut();
        for at in src.cells() {
            cells.remove(at.row, at.column);
        }
        self.paste(dst, block)
    }

    fn fill_series(
        &mut self,
        range: RangeAddress,
        direction: FillDirection,
        mode: FillMode,
    ) -> Result<()> {
        self.check(SessionOp::FillSeries)?;
        check_range(range)?;
        let r = range.normalized();
        let cells = self.sheet_mut(r.sheet)?.cells_mut();

        match direction {
            FillDirection::ToBottom | FillDirection::ToTop => {
                let (source_row, sign) = match direction {
                    FillDirection::ToBottom => (r.start_row, 1),
                    _ => (r.end_row, -1),
                };
                for col in r.start_column..=r.end_column {
                    let source = cells.get(source_row, col).cloned().unwrap_or_default();
                    for i in 1..r.row_count() {
                        cells.set(source_row + sign * i, col, series_step(&source, mode, i));
                    }
                }
            }
            FillDirection::ToRight | FillDirection::ToLeft => {
                let (source_col, sign) = match direction {
                    FillDirection::ToRight => (r.start_column, 1),
                    _ => (r.end_column, -1),
                };
                for row in r.start_row..=r.end_row {
                    let source = cells.get(row, source_col).cloned().unwrap_or_default();
                    for i in 1..r.column_count() {
                        cells.set(row, source_col + sign * i, series_step(&source, mode, i));
                    }
                }
            }
        }

        debug!(range = %r, ?direction, "filled series");
        Ok(())
    }

    fn current_region(&self, range: RangeAddress) -> Result<RangeAddress> {
        self.live()?;
        check_range(range)?;
        Ok(self.sheet_ref(range.sheet)?.current_region(range))
    }

    fn formula_cells(&self, range: RangeAddress) -> Result<Vec<RangeAddress>> {
        self.live()?;
        check_range(range)?;
        let sheet = self.sheet_ref(range.sheet)?;
        Ok(sheet.runs(range.normalized(), |c| {
            matches!(c, Some(CellContent::Formula(_)))
        }))
    }

    fn empty_cells(&self, range: RangeAddress) -> Result<Vec<RangeAddress>> {
        self.live()?;
        check_range(range)?;
        let r = range.normalized();
        let sheet = self.sheet_ref(r.sheet)?;

        // An entirely blank range reports no empty cells at all
        let any_content = (r.start_row..=r.end_row)
            .any(|row| sheet.cells().row_has_content(row, r.start_column, r.end_column));
        if !any_content {
            return Ok(Vec::new());
        }

        Ok(sheet.runs(r, |c| c.is_none()))
    }
}

impl MergeControl for MemoryDocument {
    fn merged_ranges(&self, area: RangeAddress) -> Result<Vec<RangeAddress>> {
        self.live()?;
        let sheet = self.sheet_ref(area.sheet)?;
        Ok(sheet
            .merged_regions()
            .iter()
            .filter(|m| m.overlaps(&area))
            .copied()
            .collect())
    }

    fn set_merge(&mut self, range: RangeAddress, merged: bool) -> Result<()> {
        self.check(SessionOp::SetMerge)?;
        check_range(range)?;
        let range = range.normalized();
        let sheet = self.sheet_mut(range.sheet)?;

        if !merged {
            sheet.unmerge_cells(range);
        } else if !range.is_single_cell() {
            sheet.merge_cells(range)?;
        }
        Ok(())
    }
}

impl SelectionControl for MemoryDocument {
    fn selection(&self) -> Result<Vec<RangeAddress>> {
        self.live()?;
        Ok(self.selection.clone())
    }

    fn select(&mut self, ranges: &[RangeAddress]) -> Result<()> {
        self.check(SessionOp::Select)?;
        for range in ranges {
            check_range(*range)?;
            self.sheet_ref(range.sheet)?;
        }
        self.selection = ranges.to_vec();
        Ok(())
    }
}

impl NamedRangeSource for MemoryDocument {
    fn reference_position(&self, name: &str) -> Result<Option<CellAddress>> {
        self.live()?;
        Ok(self.names.get(name).map(|n| n.refers_to.top_left()))
    }

    fn named_range_count(&self) -> Result<usize> {
        self.live()?;
        Ok(self.names.len())
    }

    fn add_named_range(&mut self, name: &str, content: &str, position: CellAddress) -> Result<()> {
        self.check(SessionOp::AddNamedRange)?;
        let range = self.resolve_reference(content, position)?;
        self.define_name(name, range)
    }

    fn remove_named_range(&mut self, name: &str) -> Result<bool> {
        self.check(SessionOp::RemoveNamedRange)?;
        Ok(self.names.remove(name).is_some())
    }
}

impl SheetControl for MemoryDocument {
    fn insert_sheet(&mut self, name: &str, index: i32) -> Result<()> {
        self.check(SessionOp::InsertSheet)?;
        if name.is_empty() {
            return Err(Error::invalid_argument("sheet name is empty"));
        }
        let at = usize::try_from(index)
            .ok()
            .filter(|i| *i <= self.sheets.len())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "sheet index {} outside 0..={}",
                    index,
                    self.sheets.len()
                ))
            })?;
        if self.sheet_index(name).is_some() {
            return Err(Error::invalid_argument(format!(
                "sheet '{}' already exists",
                name
            )));
        }

        self.sheets.insert(at, MemorySheet::new(name));
        self.reindex();
        self.names.sheet_inserted(index);
        for range in &mut self.selection {
            if range.sheet >= index {
                range.sheet += 1;
            }
        }

        debug!(sheet = name, index, "inserted sheet");
        Ok(())
    }

    fn remove_sheet(&mut self, name: &str) -> Result<bool> {
        self.check(SessionOp::RemoveSheet)?;
        if name.is_empty() {
            return Err(Error::invalid_argument("sheet name is empty"));
        }
        let index = match self.sheet_index(name) {
            Some(index) => index,
            None => return Ok(false),
        };
        if self.sheets.len() == 1 {
            return Err(Error::precondition(format!(
                "cannot remove '{}', the only sheet",
                name
            )));
        }

        self.sheets.remove(index as usize);
        self.reindex();
        for dropped in self.names.sheet_removed(index) {
            warn!(named_range = %dropped, "named range removed with its sheet");
        }
        self.selection.retain(|range| range.sheet != index);
        for range in &mut self.selection {
            if range.sheet > index {
                range.sheet -= 1;
            }
        }

        debug!(sheet = name, index, "removed sheet");
        Ok(true)
    }
}

impl SheetSettings for MemoryDocument {
    fn expand_references(&self) -> Result<bool> {
        self.live()?;
        Ok(self.expand_references)
    }

    fn set_expand_references(&mut self, expand: bool) -> Result<()> {
        self.check(SessionOp::SetExpandReferences)?;
        self.expand_references = expand;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(s: &str) -> CellAddress {
        CellAddress::parse(0, s).unwrap()
    }

    fn range(s: &str) -> RangeAddress {
        RangeAddress::parse(0, s).unwrap()
    }

    fn doc() -> MemoryDocument {
        MemoryDocument::with_sheet("Sheet1")
    }

    #[test]
    fn test_cells_round_trip_through_traits() {
        let mut doc = doc();
        doc.set_cell_string(cell("A1"), "text").unwrap();
        doc.set_cell_value(cell("B1"), 2.5).unwrap();
        doc.set_cell_formula(cell("C1"), "A1&B1").unwrap();

        assert_eq!(doc.cell(cell("A1")).unwrap(), CellContent::from("text"));
        assert_eq!(doc.cell(cell("B1")).unwrap(), CellContent::Number(2.5));
        assert_eq!(doc.cell(cell("C1")).unwrap(), CellContent::formula("=A1&B1"));
        assert_eq!(doc.cell(cell("D1")).unwrap(), CellContent::Empty);
    }

    #[test]
    fn test_missing_sheet_and_negative_index() {
        let mut doc = doc();
        let err = doc.cell(CellAddress::new(3, 0, 0)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = doc.set_cell_value(CellAddress::new(0, -1, 0), 1.0).unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(doc.has_sheet(0).unwrap());
        assert!(!doc.has_sheet(1).unwrap());
        assert!(!doc.has_sheet(-1).unwrap());
    }

    #[test]
    fn test_insert_and_remove_rows() {
        let mut doc = doc();
        doc.set_cell_string(cell("A1"), "head").unwrap();
        doc.set_cell_string(cell("A2"), "body").unwrap();

        doc.insert_rows(0, 1, 3).unwrap();
        assert_eq!(doc.get(cell("A5")), CellContent::from("body"));
        assert_eq!(doc.get(cell("A2")), CellContent::Empty);

        doc.remove_rows(0, 1, 3).unwrap();
        assert_eq!(doc.get(cell("A2")), CellContent::from("body"));

        assert!(doc.insert_rows(0, 1, 0).unwrap_err().is_invalid_argument());
        assert!(matches!(
            doc.insert_rows(2, 1, 1).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_copy_and_move() {
        let mut doc = doc();
        doc.set_cell_string(cell("A3"), "x").unwrap();
        doc.set_cell_formula(cell("B3"), "=A3").unwrap();
        doc.set_cell_string(cell("C1"), "overwritten").unwrap();

        doc.copy_range(cell("B1"), range("A3:B3")).unwrap();
        assert_eq!(doc.get(cell("B1")), CellContent::from("x"));
        // Formulas are copied verbatim
        assert_eq!(doc.get(cell("C1")), CellContent::formula("=A3"));
        assert_eq!(doc.get(cell("A3")), CellContent::from("x"));

        doc.move_range(cell("A10"), range("A3:B3")).unwrap();
        assert_eq!(doc.get(cell("A3")), CellContent::Empty);
        assert_eq!(doc.get(cell("A10")), CellContent::from("x"));
        assert_eq!(doc.get(cell("B10")), CellContent::formula("=A3"));
    }

    #[test]
    fn test_move_overlapping() {
        let mut doc = doc();
        doc.set_cell_string(cell("A1"), "1").unwrap();
        doc.set_cell_string(cell("A2"), "2").unwrap();

        doc.move_range(cell("A2"), range("A1:A2")).unwrap();
        assert_eq!(doc.get(cell("A1")), CellContent::Empty);
        assert_eq!(doc.get(cell("A2")), CellContent::from("1"));
        assert_eq!(doc.get(cell("A3")), CellContent::from("2"));
    }

    #[test]
    fn test_fill_series() {
        let mut doc = doc();
        doc.set_cell_formula(cell("A1"), "=B1*2").unwrap();
        doc.set_cell_value(cell("B1"), 10.0).unwrap();

        doc.fill_series(range("A1:A3"), FillDirection::ToBottom, FillMode::Simple)
            .unwrap();
        assert_eq!(doc.get(cell("A3")), CellContent::formula("=B1*2"));

        doc.fill_series(
            range("B1:B3"),
            FillDirection::ToBottom,
            FillMode::Linear { step: 5.0 },
        )
        .unwrap();
        assert_eq!(doc.get(cell("B2")), CellContent::Number(15.0));
        assert_eq!(doc.get(cell("B3")), CellContent::Number(20.0));

        doc.set_cell_value(cell("F5"), 1.0).unwrap();
        doc.fill_series(
            range("D5:F5"),
            FillDirection::ToLeft,
            FillMode::Linear { step: 1.0 },
        )
        .unwrap();
        assert_eq!(doc.get(cell("D5")), CellContent::Number(3.0));
    }

    #[test]
    fn test_content_queries() {
        let mut doc = doc();
        doc.set_cell_string(cell("A1"), "a").unwrap();
        doc.set_cell_formula(cell("B1"), "=A1").unwrap();
        doc.set_cell_formula(cell("C1"), "=B1").unwrap();

        assert_eq!(doc.formula_cells(range("A1:D1")).unwrap(), vec![range("B1:C1")]);
        assert_eq!(doc.empty_cells(range("A1:D2")).unwrap(), vec![range("D1"), range("A2:D2")]);

        // Entirely blank ranges report nothing
        assert_eq!(doc.empty_cells(range("A5:D6")).unwrap(), Vec::new());

        assert_eq!(doc.current_region(range("A1")).unwrap(), range("A1:C1"));
    }

    #[test]
    fn test_merges() {
        let mut doc = doc();
        doc.set_merge(range("A1:B1"), true).unwrap();
        doc.set_merge(range("D4:D6"), true).unwrap();
        doc.set_merge(range("F1"), true).unwrap();

        assert_eq!(doc.merged_ranges(range("A1:C3")).unwrap(), vec![range("A1:B1")]);
        assert_eq!(doc.merged_regions(0).len(), 2);

        doc.set_merge(range("A1:B1"), false).unwrap();
        assert_eq!(doc.merged_regions(0), &[range("D4:D6")]);
    }

    #[test]
    fn test_named_ranges() {
        let mut doc = doc();
        doc.add_sheet("Data");

        doc.add_named_range("Header", "$A$5:$C$5", cell("A1")).unwrap();
        doc.add_named_range("Other", "Data!B2", cell("A1")).unwrap();
        doc.add_named_range("Dotted", "$Data.$C$3", cell("A1")).unwrap();

        assert_eq!(doc.named_range_count().unwrap(), 3);
        assert_eq!(doc.reference_position("header").unwrap(), Some(cell("A5")));
        assert_eq!(
            doc.reference_position("Other").unwrap(),
            Some(CellAddress::new(1, 1, 1))
        );
        assert_eq!(
            doc.reference_position("dotted").unwrap(),
            Some(CellAddress::new(1, 2, 2))
        );
        assert_eq!(doc.reference_position("missing").unwrap(), None);

        assert!(doc.add_named_range("Bad", "Nope!A1", cell("A1")).is_err());
        assert!(doc.remove_named_range("OTHER").unwrap());
        assert!(!doc.remove_named_range("Other").unwrap());
    }

    #[test]
    fn test_names_expand_only_with_setting() {
        let mut doc = doc();
        doc.define_name("List", range("A2:C4")).unwrap();

        doc.insert_rows(0, 4, 1).unwrap();
        assert_eq!(doc.named_range("List"), Some(range("A2:C4")));

        doc.set_expand_references(true).unwrap();
        doc.insert_rows(0, 4, 2).unwrap();
        assert_eq!(doc.named_range("List"), Some(range("A2:C6")));
    }

    #[test]
    fn test_selection() {
        let mut doc = doc();
        assert!(doc.selection().unwrap().is_empty());

        doc.select(&[range("B2:C3")]).unwrap();
        assert_eq!(doc.selection().unwrap(), vec![range("B2:C3")]);

        let err = doc.select(&[RangeAddress::parse(4, "A1").unwrap()]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_insert_and_remove_sheets() {
        let mut doc = doc();
        doc.add_sheet("Data");
        doc.merge(RangeAddress::parse(1, "A1:B1").unwrap()).unwrap();
        doc.define_name("Total", RangeAddress::parse(1, "C3").unwrap())
            .unwrap();
        doc.define_name("Head", range("A1")).unwrap();

        doc.insert_sheet("Cover", 0).unwrap();
        assert_eq!(doc.sheet_count().unwrap(), 3);
        assert_eq!(doc.find_sheet("data").unwrap(), Some(2));
        assert_eq!(doc.named_range("Total"), Some(RangeAddress::parse(2, "C3").unwrap()));
        assert_eq!(
            doc.merged_ranges(RangeAddress::parse(2, "A1:C3").unwrap())
                .unwrap(),
            vec![RangeAddress::parse(2, "A1:B1").unwrap()]
        );

        assert!(doc.insert_sheet("", 0).unwrap_err().is_invalid_argument());
        assert!(doc.insert_sheet("Late", 4).unwrap_err().is_invalid_argument());
        assert!(doc.insert_sheet("late", -1).unwrap_err().is_invalid_argument());
        assert!(doc.insert_sheet("COVER", 1).unwrap_err().is_invalid_argument());

        assert!(doc.remove_sheet("sheet1").unwrap());
        assert!(!doc.remove_sheet("Sheet1").unwrap());
        assert_eq!(doc.named_range("Head"), None);
        assert_eq!(doc.named_range("Total"), Some(RangeAddress::parse(1, "C3").unwrap()));
        assert_eq!(doc.merged_regions(1), &[RangeAddress::parse(1, "A1:B1").unwrap()]);

        assert!(doc.remove_sheet("Cover").unwrap());
        let err = doc.remove_sheet("Data").unwrap_err();
        assert!(matches!(err, Error::StructuralPreconditionFailed(_)));
    }

    #[test]
    fn test_dispose() {
        let mut doc = doc();
        doc.dispose();

        assert!(doc.is_disposed());
        assert!(matches!(
            doc.sheet_count().unwrap_err(),
            Error::CollaboratorUnavailable(_)
        ));
        assert!(matches!(
            doc.insert_rows(0, 0, 1).unwrap_err(),
            Error::CollaboratorUnavailable(_)
        ));
    }

    #[test]
    fn test_fail_on() {
        let mut doc = doc();
        doc.fail_on(SessionOp::CopyRange);

        assert!(matches!(
            doc.copy_range(cell("A2"), range("A1")).unwrap_err(),
            Error::CollaboratorUnavailable(_)
        ));
        doc.insert_rows(0, 0, 1).unwrap();

        doc.clear_failures();
        doc.copy_range(cell("A2"), range("A1")).unwrap();
    }
}
