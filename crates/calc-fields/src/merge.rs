//! Merged-region tracking across structural edits
//!
//! A [`MergeTracker`] lives for one list edit. It records the merged ranges
//! around the edited area, unmerges them so rows can be inserted or removed
//! freely, follows the grid while rows move, puts merged content back where
//! it belongs and finally re-merges every footprint.
//!
//! Calls must follow the state machine
//! `Idle -> Snapshotted -> Unmerged -> Repositioned -> Idle`; anything else is
//! rejected with [`Error::StructuralPreconditionFailed`] before the document is
//! touched.

use tracing::{debug, warn};

use calc_fields_core::{
    CellAddress, Error, GridEditor, MergeControl, RangeAddress, Result,
};

/// Where a tracker is in its edit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Snapshotted,
    Unmerged,
    Repositioned,
}

/// One merged cell group followed through an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    /// Footprint re-merged at the end of the edit
    pub range: RangeAddress,
    /// Where the range's content currently sits
    pub current_top_left: CellAddress,
    /// Whether the content is moved by [`MergeTracker::move_up`] /
    /// [`MergeTracker::move_down`] (top-left inside the edited area)
    pub movable: bool,
}

impl MergedRange {
    fn new(range: RangeAddress, area: &RangeAddress) -> Self {
        Self {
            range,
            current_top_left: range.top_left(),
            movable: area.contains(&range.top_left()),
        }
    }
}

/// Merged-region tracker for one edit operation
#[derive(Debug, Clone)]
pub struct MergeTracker {
    state: TrackerState,
    area: Option<RangeAddress>,
    ranges: Vec<MergedRange>,
}

impl MergeTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self {
            state: TrackerState::Idle,
            area: None,
            ranges: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Area recorded by the last snapshot
    pub fn area(&self) -> Option<RangeAddress> {
        self.area
    }

    /// Ranges being tracked, in snapshot order
    pub fn ranges(&self) -> &[MergedRange] {
        &self.ranges
    }

    fn require(&self, allowed: &[TrackerState], op: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::precondition(format!(
                "merge tracker cannot {} while {:?}",
                op, self.state
            )))
        }
    }

    fn reset(&mut self) {
        self.state = TrackerState::Idle;
        self.area = None;
        self.ranges.clear();
    }

    /// Record the merged ranges intersecting `area`
    ///
    /// Returns the number of ranges recorded.
    pub fn snapshot<D: MergeControl>(&mut self, doc: &D, area: RangeAddress) -> Result<usize> {
        self.require(&[TrackerState::Idle], "snapshot")?;

        let area = area.normalized();
        self.ranges = doc
            .merged_ranges(area)?
            .into_iter()
            .filter(|m| m.sheet == area.sheet)
            .map(|m| MergedRange::new(m.normalized(), &area))
            .collect();
        self.area = Some(area);
        self.state = TrackerState::Snapshotted;

        debug!(area = %area, merged = self.ranges.len(), "snapshot merged ranges");
        Ok(self.ranges.len())
    }

    /// Clear the merge flag of every recorded range
    ///
    /// Calling it again before repositioning is a no-op.
    pub fn unmerge<D: MergeControl>(&mut self, doc: &mut D) -> Result<()> {
        if self.state == TrackerState::Unmerged {
            return Ok(());
        }
        self.require(&[TrackerState::Snapshotted], "unmerge")?;

        for merged in &self.ranges {
            doc.set_merge(merged.range, false)?;
        }
        self.state = TrackerState::Unmerged;
        Ok(())
    }

    /// Follow an insertion of `count` rows before `at_row` on `sheet`
    ///
    /// Content moves with the grid. Footprints keep their size and only move
    /// for rows inserted strictly above them.
    pub fn rows_inserted(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()> {
        self.require(&[TrackerState::Unmerged], "follow an insertion")?;

        for merged in self.ranges.iter_mut().filter(|m| m.range.sheet == sheet) {
            if merged.current_top_left.row >= at_row {
                merged.current_top_left = merged.current_top_left.offset(count, 0);
            }
            if merged.range.start_row > at_row {
                merged.range = merged.range.offset(count, 0);
            }
        }
        Ok(())
    }

    /// Follow a removal of rows `at_row..at_row + count` on `sheet`
    ///
    /// Footprints shrink or move up; a footprint removed entirely is dropped
    /// and will not be re-merged.
    pub fn rows_removed(&mut self, sheet: i32, at_row: i32, count: i32) -> Result<()> {
        self.require(
            &[TrackerState::Unmerged, TrackerState::Repositioned],
            "follow a removal",
        )?;

        let last_removed = at_row + count - 1;
        self.ranges.retain_mut(|merged| {
            if merged.range.sheet != sheet {
                return true;
            }

            let top = &mut merged.current_top_left;
            if top.row > last_removed {
                *top = top.offset(-count, 0);
            } else if top.row >= at_row {
                *top = CellAddress::new(top.sheet, top.column, at_row);
            }

            let r = &mut merged.range;
            let kept_above = (at_row - r.start_row).clamp(0, r.row_count());
            let kept_below = (r.end_row - last_removed).clamp(0, r.row_count());
            if r.end_row >= at_row && r.start_row <= last_removed {
                if kept_above + kept_below == 0 {
                    debug!(range = %r, "merged range removed with its rows");
                    return false;
                }
                r.start_row = r.start_row.min(at_row);
                r.end_row = r.start_row + kept_above + kept_below - 1;
            } else if r.start_row > last_removed {
                *r = r.offset(-count, 0);
            }
            true
        });
        Ok(())
    }

    /// After an insertion: move the content of every movable range from its
    /// shifted position back to its footprint's top-left, last range first
    pub fn move_up<D: GridEditor>(&mut self, doc: &mut D) -> Result<()> {
        self.require(&[TrackerState::Unmerged], "move merged content up")?;

        for merged in self.ranges.iter_mut().rev().filter(|m| m.movable) {
            let target = merged.range.top_left();
            if merged.current_top_left != target {
                doc.move_range(target, merged.current_top_left.to_range())?;
                merged.current_top_left = target;
            }
        }
        self.state = TrackerState::Repositioned;
        Ok(())
    }

    /// Before a removal: rescue the content of movable ranges reaching the
    /// area's last row by moving it to the row just below the area
    ///
    /// The target cell is only overwritten when it belongs to the range
    /// itself. A range ending on the area's last row is rescued into a blank
    /// cell only; otherwise its content goes with the removed rows.
    pub fn move_down<D: GridEditor>(&mut self, doc: &mut D) -> Result<()> {
        self.require(&[TrackerState::Unmerged], "move merged content down")?;
        let area = self
            .area
            .ok_or_else(|| Error::precondition("merge tracker has no area"))?;

        for merged in self.ranges.iter_mut().rev().filter(|m| m.movable) {
            if merged.range.end_row < area.end_row {
                continue;
            }
            let target = CellAddress::new(
                merged.range.sheet,
                merged.range.start_column,
                area.end_row.saturating_add(1),
            );
            if merged.range.end_row == area.end_row && !doc.cell(target)?.is_empty() {
                warn!(
                    range = %merged.range,
                    target = %target,
                    "target cell is occupied, merged content removed with its rows"
                );
                continue;
            }
            doc.move_range(target, merged.current_top_left.to_range())?;
            merged.current_top_left = target;
        }
        self.state = TrackerState::Repositioned;
        Ok(())
    }

    /// Merge every surviving footprint again and return to idle
    pub fn remerge<D: MergeControl>(&mut self, doc: &mut D) -> Result<()> {
        self.require(&[TrackerState::Repositioned], "remerge")?;

        for merged in self.ranges.iter().filter(|m| !m.range.is_single_cell()) {
            doc.set_merge(merged.range, true)?;
        }
        debug!(merged = self.ranges.len(), "remerged ranges");
        self.reset();
        Ok(())
    }

    /// Best-effort re-merge after a failed edit, then return to idle
    ///
    /// Failures are logged, not returned.
    pub fn abort<D: MergeControl>(&mut self, doc: &mut D) {
        if self.state != TrackerState::Idle {
            for merged in self.ranges.iter().filter(|m| !m.range.is_single_cell()) {
                if let Err(err) = doc.set_merge(merged.range, true) {
                    warn!(range = %merged.range, error = %err, "could not remerge range");
                }
            }
        }
        self.reset();
    }
}

impl Default for MergeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_fields_core::{CellAccess, CellContent};
    use calc_fields_memory::{MemoryDocument, SessionOp};
    use pretty_assertions::assert_eq;

    fn cell(s: &str) -> CellAddress {
        CellAddress::parse(0, s).unwrap()
    }

    fn range(s: &str) -> RangeAddress {
        RangeAddress::parse(0, s).unwrap()
    }

    fn doc_with_merges() -> MemoryDocument {
        let mut doc = MemoryDocument::with_sheet("Sheet1");
        doc.merge(range("A3:C4")).unwrap();
        doc.merge(range("A5:A6")).unwrap();
        doc.merge(range("B7:C7")).unwrap();
        doc.set_cell_string(cell("A5"), "label").unwrap();
        doc
    }

    #[test]
    fn test_snapshot_marks_movable() {
        let doc = doc_with_merges();
        let mut tracker = MergeTracker::new();

        let n = tracker.snapshot(&doc, range("A4:C6")).unwrap();
        assert_eq!(n, 2);
        assert_eq!(tracker.state(), TrackerState::Snapshotted);

        let movable: Vec<_> = tracker.ranges().iter().map(|m| m.movable).collect();
        assert_eq!(movable, vec![false, true]);
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let mut doc = doc_with_merges();
        let mut tracker = MergeTracker::new();

        for err in [
            tracker.unmerge(&mut doc).unwrap_err(),
            tracker.move_up(&mut doc).unwrap_err(),
            tracker.remerge(&mut doc).unwrap_err(),
            tracker.rows_inserted(0, 1, 1).unwrap_err(),
        ] {
            assert!(matches!(err, Error::StructuralPreconditionFailed(_)));
        }

        tracker.snapshot(&doc, range("A5")).unwrap();
        assert!(tracker.snapshot(&doc, range("A5")).is_err());
        assert!(tracker.move_down(&mut doc).is_err());

        // Nothing was unmerged by the rejected calls
        assert_eq!(doc.merged_regions(0).len(), 3);
    }

    #[test]
    fn test_unmerge_is_idempotent() {
        let mut doc = doc_with_merges();
        let mut tracker = MergeTracker::new();
        tracker.snapshot(&doc, range("A5:C7")).unwrap();

        tracker.unmerge(&mut doc).unwrap();
        tracker.unmerge(&mut doc).unwrap();
        assert_eq!(doc.merged_regions(0), &[range("A3:C4")]);
    }

    #[test]
    fn test_insert_keeps_footprint_at_insert_row() {
        let mut doc = doc_with_merges();
        let mut tracker = MergeTracker::new();
        tracker.snapshot(&doc, range("A5:C6")).unwrap();
        tracker.unmerge(&mut doc).unwrap();

        doc.insert_rows(0, 4, 2).unwrap();
        tracker.rows_inserted(0, 4, 2).unwrap();
        assert_eq!(tracker.ranges()[0].current_top_left, cell("A7"));

        tracker.move_up(&mut doc).unwrap();
        assert_eq!(doc.get(cell("A5")), CellContent::from("label"));
        assert_eq!(doc.get(cell("A7")), CellContent::Empty);

        tracker.remerge(&mut doc).unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(doc.merged_regions(0).contains(&range("A5:A6")));
    }

    #[test]
    fn test_rows_removed_shrinks_and_drops() {
        let mut tracker = MergeTracker {
            state: TrackerState::Unmerged,
            area: Some(range("A1:C10")),
            ranges: vec![
                MergedRange::new(range("A2:A3"), &range("A1:C10")),
                MergedRange::new(range("B4:B8"), &range("A1:C10")),
                MergedRange::new(range("C12:C13"), &range("A1:C10")),
            ],
        };

        // Remove rows 2..3 (A2:A3 gone entirely)
        tracker.rows_removed(0, 1, 2).unwrap();

        let footprints: Vec<_> = tracker.ranges().iter().map(|m| m.range).collect();
        assert_eq!(footprints, vec![range("B2:B6"), range("C10:C11")]);
    }

    #[test]
    fn test_move_down_never_overwrites_next_row() {
        let mut doc = MemoryDocument::with_sheet("Sheet1");
        doc.merge(range("C5:C6")).unwrap();
        doc.set_cell_string(cell("C5"), "label").unwrap();
        doc.set_cell_string(cell("C7"), "next").unwrap();
        doc.merge(range("D5:D6")).unwrap();
        doc.set_cell_string(cell("D5"), "moved").unwrap();

        let mut tracker = MergeTracker::new();
        tracker.snapshot(&doc, range("A5:D6")).unwrap();
        tracker.unmerge(&mut doc).unwrap();
        tracker.move_down(&mut doc).unwrap();

        // Occupied target: left in place, goes with its rows
        assert_eq!(doc.get(cell("C5")), CellContent::from("label"));
        assert_eq!(doc.get(cell("C7")), CellContent::from("next"));

        // Blank target: rescued below the area
        assert_eq!(doc.get(cell("D5")), CellContent::Empty);
        assert_eq!(doc.get(cell("D7")), CellContent::from("moved"));
    }

    #[test]
    fn test_abort_remerges() {
        let mut doc = doc_with_merges();
        let mut tracker = MergeTracker::new();
        tracker.snapshot(&doc, range("A1:C7")).unwrap();
        tracker.unmerge(&mut doc).unwrap();
        assert!(doc.merged_regions(0).is_empty());

        doc.fail_on(SessionOp::MoveRange);
        doc.insert_rows(0, 4, 1).unwrap();
        tracker.rows_inserted(0, 4, 1).unwrap();
        assert!(tracker.move_up(&mut doc).is_err());

        tracker.abort(&mut doc);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(
            doc.merged_regions(0),
            &[range("A3:C4"), range("A5:A6"), range("B8:C8")]
        );
    }
}
