//! Sheet type

use calc_fields_core::{CellContent, Error, RangeAddress, Result};

use crate::names::shrink_rows;
use crate::storage::CellStorage;

/// A single sheet of a [`MemoryDocument`](crate::MemoryDocument)
#[derive(Debug, Clone)]
pub struct MemorySheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Merged cell regions, in merge order
    merged_regions: Vec<RangeAddress>,
}

impl MemorySheet {
    /// Create a new sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            merged_regions: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell storage of this sheet
    pub fn cells(&self) -> &CellStorage {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut CellStorage {
        &mut self.cells
    }

    /// Content at a position (empty if nothing is stored)
    pub fn content_at(&self, row: i32, col: i32) -> CellContent {
        self.cells.get(row, col).cloned().unwrap_or_default()
    }

    // === Merged Cells ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[RangeAddress] {
        &self.merged_regions
    }

    /// Merge cells
    pub fn merge_cells(&mut self, range: RangeAddress) -> Result<()> {
        // Check for overlap with existing merged regions
        for existing in &self.merged_regions {
            if existing == &range {
                return Ok(());
            }
            if range.overlaps(existing) {
                return Err(Error::precondition(format!(
                    "{} overlaps merged region {}",
                    range, existing
                )));
            }
        }
        self.merged_regions.push(range);
        Ok(())
    }

    /// Unmerge cells, returning whether the region was merged
    pub fn unmerge_cells(&mut self, range: RangeAddress) -> bool {
        let before = self.merged_regions.len();
        self.merged_regions.retain(|existing| existing != &range);
        self.merged_regions.len() != before
    }

    // === Structural edits ===

    /// Rebind merged regions after the sheet moved to `index`
    pub(crate) fn set_index(&mut self, index: i32) {
        for region in &mut self.merged_regions {
            region.sheet = index;
        }
    }

    pub(crate) fn insert_rows(&mut self, at_row: i32, count: i32) {
        self.cells.insert_rows(at_row, count);

        for region in &mut self.merged_regions {
            if region.start_row >= at_row {
                *region = region.offset(count, 0);
            } else if region.end_row >= at_row {
                region.end_row += count;
            }
        }
    }

    pub(crate) fn remove_rows(&mut self, at_row: i32, count: i32) {
        self.cells.remove_rows(at_row, count);

        self.merged_regions.retain_mut(|region| {
            match shrink_rows(region.start_row, region.end_row, at_row, count) {
                Some((start, end)) => {
                    region.start_row = start;
                    region.end_row = end;
                    !region.is_single_cell()
                }
                None => false,
            }
        });
    }

    /// The contiguous non-empty block surrounding `range`
    ///
    /// Grows the range one row or column at a time while any cell bordering it
    /// (diagonals included) holds content.
    pub fn current_region(&self, range: RangeAddress) -> RangeAddress {
        let mut region = range.normalized();

        loop {
            let mut grown = false;
            let first_col = (region.start_column - 1).max(0);
            let last_col = region.end_column + 1;

            if region.start_row > 0
                && self
                    .cells
                    .row_has_content(region.start_row - 1, first_col, last_col)
            {
                region.start_row -= 1;
                grown = true;
            }
            if self
                .cells
                .row_has_content(region.end_row + 1, first_col, last_col)
            {
                region.end_row += 1;
                grown = true;
            }

            let first_row = (region.start_row - 1).max(0);
            let last_row = region.end_row + 1;

            if region.start_column > 0
                && self
                    .cells
                    .column_has_content(region.start_column - 1, first_row, last_row)
            {
                region.start_column -= 1;
                grown = true;
            }
            if self
                .cells
                .column_has_content(region.end_column + 1, first_row, last_row)
            {
                region.end_column += 1;
                grown = true;
            }

            if !grown {
                return region;
            }
        }
    }

    /// Row-wise runs of cells in `range` matching `pred`
    pub(crate) fn runs(
        &self,
        range: RangeAddress,
        pred: impl Fn(Option<&CellContent>) -> bool,
    ) -> Vec<RangeAddress> {
        let mut runs = Vec::new();

        for row in range.start_row..=range.end_row {
            let mut run_start = None;
            for col in range.start_column..=range.end_column {
                let hit = pred(self.cells.get(row, col));
                match (hit, run_start) {
                    (true, None) => run_start = Some(col),
                    (false, Some(start)) => {
                        runs.push(RangeAddress::new(range.sheet, start, row, col - 1, row));
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                runs.push(RangeAddress::new(
                    range.sheet,
                    start,
                    row,
                    range.end_column,
                    row,
                ));
            }
        }

        runs
    }
}
