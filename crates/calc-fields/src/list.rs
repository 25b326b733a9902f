//! List-region edits
//!
//! A "list" is the block of rows the user selected, widened to the columns of
//! the contiguous data around it. [`ListEditor`] inserts blank rows into such
//! a list or removes rows from it without breaking the merged cells around it,
//! and drags the formulas of the row above down into new rows.

use tracing::{debug, info, warn};

use calc_fields_core::{
    DocumentSession, Error, FillDirection, FillMode, RangeAddress, Result,
};

use crate::fields::FieldCache;
use crate::insert::RowInserter;
use crate::merge::MergeTracker;

/// Options for list edits
#[derive(Debug, Clone, PartialEq)]
pub struct ListEditConfig {
    /// Drag the formulas of the row above into inserted rows
    pub drag_formulas: bool,
    /// How dragged formulas are filled
    pub fill_mode: FillMode,
    /// Select the affected cells after the edit
    pub select_after: bool,
}

impl Default for ListEditConfig {
    fn default() -> Self {
        Self {
            drag_formulas: true,
            fill_mode: FillMode::Simple,
            select_after: true,
        }
    }
}

/// The list area an edit works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListArea {
    /// Selected rows across the current region's columns
    pub area: RangeAddress,
    /// The same columns one row above, absent when the list starts at row 1
    pub top_row: Option<RangeAddress>,
}

impl ListArea {
    /// Derive the list area from the session's current selection
    ///
    /// # Errors
    ///
    /// [`Error::StructuralPreconditionFailed`] unless the selection is exactly
    /// one range on an existing sheet.
    pub fn resolve<D: DocumentSession>(doc: &D) -> Result<Self> {
        let selection = doc.selection()?;
        let selected = match selection.as_slice() {
            [single] => single.normalized(),
            [] => return Err(Error::precondition("nothing is selected")),
            ranges => {
                return Err(Error::precondition(format!(
                    "selection has {} ranges, expected one",
                    ranges.len()
                )))
            }
        };
        if !selected.is_valid() || !doc.has_sheet(selected.sheet)? {
            return Err(Error::precondition(format!(
                "selection {:?} is not on a sheet",
                selected
            )));
        }

        let region = doc.current_region(selected)?;
        Ok(Self::from_columns(selected, region))
    }

    /// List area for the rows of `selected` and the columns of `region`
    pub fn from_columns(selected: RangeAddress, region: RangeAddress) -> Self {
        let area = selected.with_columns(region.start_column, region.end_column);
        let top_row = (area.start_row > 0).then(|| area.offset(-1, 0).resize(Some(1), None));
        Self { area, top_row }
    }

    pub fn sheet(&self) -> i32 {
        self.area.sheet
    }

    /// Number of rows the edit inserts or removes
    pub fn row_count(&self) -> i32 {
        self.area.row_count()
    }
}

/// Insert and remove rows of the selected list
pub struct ListEditor<'a, D> {
    doc: &'a mut D,
    config: ListEditConfig,
    cache: Option<&'a mut FieldCache>,
}

impl<'a, D: DocumentSession> ListEditor<'a, D> {
    /// Create an editor with the default configuration
    pub fn new(doc: &'a mut D) -> Self {
        Self::with_config(doc, ListEditConfig::default())
    }

    pub fn with_config(doc: &'a mut D, config: ListEditConfig) -> Self {
        Self {
            doc,
            config,
            cache: None,
        }
    }

    /// Invalidate `cache` after every structural edit
    pub fn with_cache(mut self, cache: &'a mut FieldCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ListEditConfig {
        &self.config
    }

    /// Insert as many blank rows as are selected at the selection, inside
    /// the current region's columns
    ///
    /// Merged ranges around the list keep their place, formulas of the row
    /// above are dragged down, and the blank cells of the new rows end up
    /// selected. Returns `Ok(false)` without touching the document when the
    /// selection does not describe a list.
    pub fn insert_list_rows(&mut self) -> Result<bool> {
        let list = match self.resolve()? {
            Some(list) => list,
            None => return Ok(false),
        };

        let mut tracker = MergeTracker::new();
        let result = self.insert_with(&list, &mut tracker);
        self.finish(result, &mut tracker, "insert")?;

        info!(area = %list.area, rows = list.row_count(), "inserted list rows");
        Ok(true)
    }

    /// Remove the selected rows of the list
    ///
    /// Content of merged cells reaching past the removed rows is moved below
    /// them first, so nothing merged is lost. Returns `Ok(false)` without
    /// touching the document when the selection does not describe a list.
    pub fn remove_list_rows(&mut self) -> Result<bool> {
        let list = match self.resolve()? {
            Some(list) => list,
            None => return Ok(false),
        };

        let mut tracker = MergeTracker::new();
        let result = self.remove_with(&list, &mut tracker);
        self.finish(result, &mut tracker, "remove")?;

        info!(area = %list.area, rows = list.row_count(), "removed list rows");
        Ok(true)
    }

    fn resolve(&self) -> Result<Option<ListArea>> {
        match ListArea::resolve(&*self.doc) {
            Ok(list) => Ok(Some(list)),
            Err(err @ Error::CollaboratorUnavailable(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "no list to edit");
                Ok(None)
            }
        }
    }

    fn insert_with(&mut self, list: &ListArea, tracker: &mut MergeTracker) -> Result<()> {
        let (sheet, at_row, count) = (list.sheet(), list.area.start_row, list.row_count());

        tracker.snapshot(&*self.doc, list.area)?;
        tracker.unmerge(self.doc)?;

        RowInserter::new(&mut *self.doc).grow(sheet, at_row, count)?;
        self.invalidate_cache();
        tracker.rows_inserted(sheet, at_row, count)?;

        if self.config.drag_formulas {
            self.drag_formulas(list)?;
        }

        tracker.move_up(self.doc)?;
        tracker.remerge(self.doc)?;

        if self.config.select_after {
            let blanks = self.doc.empty_cells(list.area)?;
            if blanks.is_empty() {
                self.doc.select(&[list.area])?;
            } else {
                self.doc.select(&blanks)?;
            }
        }
        Ok(())
    }

    fn remove_with(&mut self, list: &ListArea, tracker: &mut MergeTracker) -> Result<()> {
        let (sheet, at_row, count) = (list.sheet(), list.area.start_row, list.row_count());

        tracker.snapshot(&*self.doc, list.area)?;
        tracker.unmerge(self.doc)?;
        tracker.move_down(self.doc)?;

        self.doc.remove_rows(sheet, at_row, count)?;
        self.invalidate_cache();
        tracker.rows_removed(sheet, at_row, count)?;

        tracker.remerge(self.doc)?;

        if self.config.select_after {
            self.doc.select(&[list.area])?;
        }
        Ok(())
    }

    /// Fill each formula run of the row above down through the new rows
    fn drag_formulas(&mut self, list: &ListArea) -> Result<()> {
        let top_row = match list.top_row {
            Some(top_row) => top_row,
            None => return Ok(()),
        };

        for run in self.doc.formula_cells(top_row)? {
            let target = run.resize(Some(list.row_count() + 1), None);
            debug!(range = %target, "dragging formulas");
            self.doc
                .fill_series(target, FillDirection::ToBottom, self.config.fill_mode)?;
        }
        Ok(())
    }

    fn invalidate_cache(&mut self) {
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.invalidate();
        }
    }

    /// On failure, re-merge what the tracker unmerged and pass the error on
    fn finish(&mut self, result: Result<()>, tracker: &mut MergeTracker, op: &str) -> Result<()> {
        if let Err(err) = result {
            warn!(error = %err, "list {} failed, restoring merged ranges", op);
            tracker.abort(self.doc);
            return Err(err);
        }
        Ok(())
    }
}
