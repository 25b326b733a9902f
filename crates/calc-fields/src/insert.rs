//! Templated row insertion
//!
//! [`RowInserter::insert_rows`] opens `group_count * stride` rows below an
//! anchor cell and copies the template row (the row that was directly below
//! the anchor) into the first row of every group. The template is pushed down
//! by the insertion and stays the copy source for every group, so the copies
//! never cascade.
//!
//! ```text
//! before              group_count = 2, stride = 2
//! 5  anchor           5  anchor
//! 6  template         6  template copy
//!                     7  (blank spacer)
//!                     8  template copy
//!                     9  (blank spacer)
//!                     10 template
//! ```

use tracing::{debug, info};

use calc_fields_core::{
    CellAddress, Error, GridEditor, RangeAddress, Result, SheetSettings, MAX_COLS, MAX_ROWS,
};

/// Number of groups inserted when the caller has no preference
pub const DEFAULT_GROUP_COUNT: i32 = 1;

/// Rows per group when the caller has no preference
pub const DEFAULT_STRIDE: i32 = 1;

/// Columns copied from the template row when the caller has no preference
pub const DEFAULT_TEMPLATE_WIDTH: i32 = 250;

/// What gets duplicated into each inserted group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateBlock {
    /// One row, `template_width` columns starting at column A
    pub source_range: RangeAddress,
    /// Where the next copy lands
    pub destination_anchor: CellAddress,
}

impl TemplateBlock {
    /// Template block for an insertion of `inserted` rows below `anchor`
    ///
    /// The source is the template row's position *after* the insertion.
    pub fn below(anchor: CellAddress, inserted: i32, template_width: i32) -> Self {
        let first_new_row = anchor.row + 1;
        let template_row = first_new_row + inserted;
        Self {
            source_range: RangeAddress::new(
                anchor.sheet,
                0,
                template_row,
                template_width - 1,
                template_row,
            ),
            destination_anchor: CellAddress::new(anchor.sheet, 0, first_new_row),
        }
    }

    /// Move the destination to the next group
    pub fn advance(&mut self, stride: i32) {
        self.destination_anchor = self.destination_anchor.offset(stride, 0);
    }
}

/// Row-insertion engine over a borrowed document session
pub struct RowInserter<'a, D> {
    doc: &'a mut D,
}

impl<'a, D: GridEditor> RowInserter<'a, D> {
    /// Create an engine operating on `doc`
    pub fn new(doc: &'a mut D) -> Self {
        Self { doc }
    }

    /// Insert `group_count` groups of `stride` rows below `anchor`, copying
    /// `template_width` columns of the template row into each group
    ///
    /// Returns `Ok(false)` without touching the document when `anchor.sheet`
    /// does not exist.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a non-positive count, stride or width,
    /// a negative anchor, or an insertion running past the last row. Nothing
    /// is mutated in that case.
    pub fn insert_rows(
        &mut self,
        anchor: CellAddress,
        group_count: i32,
        stride: i32,
        template_width: i32,
    ) -> Result<bool> {
        validate(anchor, group_count, stride, template_width)?;

        let inserted = group_count
            .checked_mul(stride)
            .filter(|n| *n < MAX_ROWS.saturating_sub(anchor.row.saturating_add(1)))
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "{} groups of {} rows do not fit below row {}",
                    group_count,
                    stride,
                    anchor.row.saturating_add(1)
                ))
            })?;

        if !self.doc.has_sheet(anchor.sheet)? {
            debug!(sheet = anchor.sheet, "no such sheet, nothing inserted");
            return Ok(false);
        }

        self.doc.insert_rows(anchor.sheet, anchor.row + 1, inserted)?;

        let mut block = TemplateBlock::below(anchor, inserted, template_width);
        for _ in 0..group_count {
            self.doc
                .copy_range(block.destination_anchor, block.source_range)?;
            block.advance(stride);
        }

        info!(
            anchor = %anchor,
            group_count,
            stride,
            template_width,
            "inserted template rows"
        );
        Ok(true)
    }
}

impl<'a, D: GridEditor + SheetSettings> RowInserter<'a, D> {
    /// Insert `count` blank rows before `at_row` with "expand references"
    /// enabled, so names and formulas ending directly above grow with the list
    ///
    /// The previous setting is restored afterwards, also when the insertion
    /// fails.
    pub fn grow(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()> {
        if at_row < 0 || count <= 0 {
            return Err(Error::invalid_argument(format!(
                "cannot insert {} rows at row {}",
                count, at_row
            )));
        }

        let previous = self.doc.expand_references()?;
        self.doc.set_expand_references(true)?;
        let inserted = self.doc.insert_rows(sheet, at_row, count);
        let restored = self.doc.set_expand_references(previous);

        inserted?;
        restored?;
        debug!(sheet, at_row, count, "grew list");
        Ok(())
    }
}

fn validate(anchor: CellAddress, group_count: i32, stride: i32, template_width: i32) -> Result<()> {
    if group_count <= 0 {
        return Err(Error::invalid_argument(format!(
            "group count must be positive, got {}",
            group_count
        )));
    }
    if stride <= 0 {
        return Err(Error::invalid_argument(format!(
            "stride must be positive, got {}",
            stride
        )));
    }
    if template_width <= 0 {
        return Err(Error::invalid_argument(format!(
            "template width must be positive, got {}",
            template_width
        )));
    }
    if !anchor.is_valid() {
        return Err(Error::invalid_argument(format!(
            "anchor {:?} has a negative index",
            anchor
        )));
    }
    if anchor.row >= MAX_ROWS || anchor.column >= MAX_COLS {
        return Err(Error::invalid_argument(format!(
            "anchor {:?} lies outside the sheet",
            anchor
        )));
    }
    Ok(())
}
