//! Collaborator traits for a document session.
//!
//! The editing components never own the document. They borrow something that
//! implements the narrow trait they need, so a live host-application session
//! and the in-memory session are interchangeable.
//!
//! Every call is a synchronous round trip and must be issued in order: row
//! indices shift after insertion or removal, and merged-range addresses become
//! stale as soon as the row count changes.

use crate::address::{CellAddress, RangeAddress};
use crate::content::CellContent;
use crate::error::Result;

/// Direction of a series fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDirection {
    ToBottom,
    ToRight,
    ToTop,
    ToLeft,
}

/// How a series fill derives the filled cells from the source cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    /// Repeat the source content verbatim (formulas are not recomputed)
    Simple,
    /// Add `step` per cell to a numeric source; other content repeats verbatim
    Linear { step: f64 },
}

impl Default for FillMode {
    fn default() -> Self {
        FillMode::Simple
    }
}

/// Cell reads and writes.
pub trait CellAccess {
    /// Number of sheets in the document
    fn sheet_count(&self) -> Result<i32>;

    /// Index of the sheet called `name`, if any
    fn find_sheet(&self, name: &str) -> Result<Option<i32>>;

    /// Content of one cell
    fn cell(&self, at: CellAddress) -> Result<CellContent>;

    /// Store text in a cell
    fn set_cell_string(&mut self, at: CellAddress, value: &str) -> Result<()>;

    /// Store a number in a cell
    fn set_cell_value(&mut self, at: CellAddress, value: f64) -> Result<()>;

    /// Store a formula in a cell
    fn set_cell_formula(&mut self, at: CellAddress, formula: &str) -> Result<()>;

    /// Whether `sheet` names an existing sheet
    fn has_sheet(&self, sheet: i32) -> Result<bool> {
        Ok(sheet >= 0 && sheet < self.sheet_count()?)
    }
}

/// Structural grid edits and content queries.
pub trait GridEditor: CellAccess {
    /// Insert `count` whole rows before `at_row`
    fn insert_rows(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()>;

    /// Remove `count` whole rows starting at `at_row`
    fn remove_rows(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()>;

    /// Copy `src` verbatim so its top-left lands on `dst`
    fn copy_range(&mut self, dst: CellAddress, src: RangeAddress) -> Result<()>;

    /// Move `src` so its top-left lands on `dst`, clearing the source
    fn move_range(&mut self, dst: CellAddress, src: RangeAddress) -> Result<()>;

    /// Fill `range` from its leading row/column in `direction`
    fn fill_series(&mut self, range: RangeAddress, direction: FillDirection, mode: FillMode)
        -> Result<()>;

    /// The contiguous non-empty block surrounding `range`
    fn current_region(&self, range: RangeAddress) -> Result<RangeAddress>;

    /// Sub-ranges of `range` holding formulas
    fn formula_cells(&self, range: RangeAddress) -> Result<Vec<RangeAddress>>;

    /// Sub-ranges of `range` holding no content
    ///
    /// Hosts may report nothing for a range that is entirely blank; callers
    /// must treat an empty answer as "use the whole range".
    fn empty_cells(&self, range: RangeAddress) -> Result<Vec<RangeAddress>>;
}

/// Merged cell control.
pub trait MergeControl {
    /// Merged ranges intersecting `area`, in host order
    fn merged_ranges(&self, area: RangeAddress) -> Result<Vec<RangeAddress>>;

    /// Merge or unmerge `range`
    fn set_merge(&mut self, range: RangeAddress, merged: bool) -> Result<()>;
}

/// The host's current selection.
pub trait SelectionControl {
    /// Ranges currently selected (several for a multi-selection)
    fn selection(&self) -> Result<Vec<RangeAddress>>;

    /// Replace the selection
    fn select(&mut self, ranges: &[RangeAddress]) -> Result<()>;
}

/// Adding and removing sheets.
pub trait SheetControl: CellAccess {
    /// Insert an empty sheet called `name` so it ends up at `index`
    ///
    /// Sheets from `index` on move one position up.
    fn insert_sheet(&mut self, name: &str, index: i32) -> Result<()>;

    /// Remove the sheet called `name`, returning whether it existed
    fn remove_sheet(&mut self, name: &str) -> Result<bool>;
}

/// Named ranges ("fields") of the document.
pub trait NamedRangeSource {
    /// Live reference position of `name`, or `None` if no such name exists
    fn reference_position(&self, name: &str) -> Result<Option<CellAddress>>;

    /// Number of named ranges
    fn named_range_count(&self) -> Result<usize>;

    /// Define `name` with `content` (a reference such as `A5:C5`) based at `position`
    fn add_named_range(&mut self, name: &str, content: &str, position: CellAddress)
        -> Result<()>;

    /// Remove `name`, returning whether it existed
    fn remove_named_range(&mut self, name: &str) -> Result<bool>;
}

/// Document-wide settings consulted during structural edits.
pub trait SheetSettings {
    /// Whether references next to inserted rows grow to include them
    fn expand_references(&self) -> Result<bool>;

    fn set_expand_references(&mut self, expand: bool) -> Result<()>;
}

/// Everything a list edit needs from the host.
pub trait DocumentSession:
    GridEditor + MergeControl + SelectionControl + NamedRangeSource + SheetSettings
{
}

impl<T> DocumentSession for T where
    T: GridEditor + MergeControl + SelectionControl + NamedRangeSource + SheetSettings
{
}
