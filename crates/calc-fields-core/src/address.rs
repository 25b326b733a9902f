//! Cell and range addresses
//!
//! Addresses are zero-based and carry the index of the sheet they belong to,
//! the same way the host application reports positions. Arithmetic on ranges
//! ([`RangeAddress::offset`], [`RangeAddress::resize`],
//! [`RangeAddress::intersect`], [`RangeAddress::union`]) is pure and never
//! fails: disjoint or cross-sheet inputs yield `None`.

use std::fmt;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A single cell position (e.g. "C7" on sheet 0)
///
/// Indices are signed so offsets can be applied freely; components that hand
/// addresses to the host check [`CellAddress::is_valid`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Sheet index (0-based)
    pub sheet: i32,
    /// Column index (0-based, A=0)
    pub column: i32,
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(sheet: i32, column: i32, row: i32) -> Self {
        Self { sheet, column, row }
    }

    /// Parse an A1-style address on the given sheet
    ///
    /// `$` markers are accepted and ignored.
    ///
    /// # Examples
    /// ```
    /// use calc_fields_core::CellAddress;
    ///
    /// let addr = CellAddress::parse(0, "C7").unwrap();
    /// assert_eq!(addr, CellAddress::new(0, 2, 6));
    ///
    /// let addr = CellAddress::parse(1, "$B$2").unwrap();
    /// assert_eq!(addr, CellAddress::new(1, 1, 1));
    /// ```
    pub fn parse(sheet: i32, s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let column = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: i64 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row < 1 || row > MAX_ROWS as i64 {
            return Err(Error::InvalidAddress(format!(
                "row number out of range in '{}'",
                s
            )));
        }

        Ok(Self::new(sheet, column, row as i32 - 1))
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col.max(0) as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<i32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col
                .saturating_mul(26)
                .saturating_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        let col = col - 1;

        if col >= MAX_COLS as u32 {
            return Err(Error::InvalidAddress(format!(
                "column '{}' out of range",
                letters
            )));
        }

        Ok(col as i32)
    }

    /// Whether every index is non-negative
    pub fn is_valid(&self) -> bool {
        self.sheet >= 0 && self.column >= 0 && self.row >= 0
    }

    /// Shift the address by the given deltas
    ///
    /// Indices wrap on overflow, so shifting back by the negated deltas always
    /// returns the original address. Use [`checked_offset`](Self::checked_offset)
    /// to detect leaving the `i32` range.
    pub fn offset(&self, row_delta: i32, col_delta: i32) -> Self {
        Self::new(
            self.sheet,
            self.column.wrapping_add(col_delta),
            self.row.wrapping_add(row_delta),
        )
    }

    /// Shift the address by the given deltas, or `None` on overflow
    pub fn checked_offset(&self, row_delta: i32, col_delta: i32) -> Option<Self> {
        Some(Self::new(
            self.sheet,
            self.column.checked_add(col_delta)?,
            self.row.checked_add(row_delta)?,
        ))
    }

    /// Format as A1-style string (sheet not included)
    pub fn to_a1_string(&self) -> String {
        if self.column < 0 || self.row < 0 {
            return format!("R{}C{}", self.row, self.column);
        }
        format!("{}{}", Self::column_to_letters(self.column), self.row + 1)
    }

    /// Single-cell range at this address
    pub fn to_range(&self) -> RangeAddress {
        RangeAddress::single(*self)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// A rectangular range of cells on one sheet (e.g. "A5:C8")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeAddress {
    /// Sheet index (0-based)
    pub sheet: i32,
    /// First column (inclusive)
    pub start_column: i32,
    /// First row (inclusive)
    pub start_row: i32,
    /// Last column (inclusive)
    pub end_column: i32,
    /// Last row (inclusive)
    pub end_row: i32,
}

impl RangeAddress {
    /// Create a new range, normalized so start is top-left and end is bottom-right
    pub fn new(sheet: i32, start_column: i32, start_row: i32, end_column: i32, end_row: i32) -> Self {
        Self {
            sheet,
            start_column: start_column.min(end_column),
            start_row: start_row.min(end_row),
            end_column: start_column.max(end_column),
            end_row: start_row.max(end_row),
        }
    }

    /// Create a range spanning two cells; the sheet is taken from `start`
    pub fn from_cells(start: CellAddress, end: CellAddress) -> Self {
        Self::new(start.sheet, start.column, start.row, end.column, end.row)
    }

    /// Create a single-cell range
    pub fn single(cell: CellAddress) -> Self {
        Self::new(cell.sheet, cell.column, cell.row, cell.column, cell.row)
    }

    /// Parse a range from `A1:B10` notation (or a single `B2`) on the given sheet
    pub fn parse(sheet: i32, s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(colon_pos) = s.find(':') {
            let start = CellAddress::parse(sheet, &s[..colon_pos])?;
            let end = CellAddress::parse(sheet, &s[colon_pos + 1..])?;
            Ok(Self::from_cells(start, end))
        } else {
            Ok(Self::single(CellAddress::parse(sheet, s)?))
        }
    }

    /// Return a copy with start/end swapped where needed
    pub fn normalized(&self) -> Self {
        Self::new(
            self.sheet,
            self.start_column,
            self.start_row,
            self.end_column,
            self.end_row,
        )
    }

    /// Top-left cell
    pub fn top_left(&self) -> CellAddress {
        CellAddress::new(self.sheet, self.start_column, self.start_row)
    }

    /// Bottom-right cell
    pub fn bottom_right(&self) -> CellAddress {
        CellAddress::new(self.sheet, self.end_column, self.end_row)
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> i32 {
        self.end_row - self.start_row + 1
    }

    /// Number of columns in the range
    pub fn column_count(&self) -> i32 {
        self.end_column - self.start_column + 1
    }

    /// Whether the range denotes a single cell
    pub fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_column == self.end_column
    }

    /// Whether every index is non-negative
    pub fn is_valid(&self) -> bool {
        self.top_left().is_valid()
    }

    /// Check if a cell is within this range (same sheet)
    pub fn contains(&self, cell: &CellAddress) -> bool {
        cell.sheet == self.sheet
            && cell.row >= self.start_row
            && cell.row <= self.end_row
            && cell.column >= self.start_column
            && cell.column <= self.end_column
    }

    /// Check if this range overlaps another on the same sheet
    pub fn overlaps(&self, other: &RangeAddress) -> bool {
        self.sheet == other.sheet
            && self.start_row <= other.end_row
            && self.end_row >= other.start_row
            && self.start_column <= other.end_column
            && self.end_column >= other.start_column
    }

    /// Overlapping sub-range, or `None` for disjoint or cross-sheet ranges
    pub fn intersect(&self, other: &RangeAddress) -> Option<RangeAddress> {
        if !self.overlaps(other) {
            return None;
        }

        Some(RangeAddress::new(
            self.sheet,
            self.start_column.max(other.start_column),
            self.start_row.max(other.start_row),
            self.end_column.min(other.end_column),
            self.end_row.min(other.end_row),
        ))
    }

    /// Smallest range covering both, or `None` across sheets
    pub fn union(&self, other: &RangeAddress) -> Option<RangeAddress> {
        if self.sheet != other.sheet {
            return None;
        }

        Some(RangeAddress::new(
            self.sheet,
            self.start_column.min(other.start_column),
            self.start_row.min(other.start_row),
            self.end_column.max(other.end_column),
            self.end_row.max(other.end_row),
        ))
    }

    /// Shift start and end by the given deltas
    ///
    /// Indices wrap on overflow, like [`CellAddress::offset`].
    pub fn offset(&self, row_delta: i32, col_delta: i32) -> Self {
        Self {
            sheet: self.sheet,
            start_column: self.start_column.wrapping_add(col_delta),
            start_row: self.start_row.wrapping_add(row_delta),
            end_column: self.end_column.wrapping_add(col_delta),
            end_row: self.end_row.wrapping_add(row_delta),
        }
    }

    /// Set `end = start + count - 1` on each axis whose count is given
    ///
    /// Only positive counts are applied. `None` or a non-positive count leaves
    /// that axis as it is; this is not an error, since `resize` is a pure helper
    /// and callers validate counts before they reach it.
    pub fn resize(&self, rows: Option<i32>, columns: Option<i32>) -> Self {
        let mut out = *self;
        if let Some(rows) = rows.filter(|n| *n > 0) {
            out.end_row = out.start_row + rows - 1;
        }
        if let Some(columns) = columns.filter(|n| *n > 0) {
            out.end_column = out.start_column + columns - 1;
        }
        out
    }

    /// Same rows, with the column span replaced
    pub fn with_columns(&self, start_column: i32, end_column: i32) -> Self {
        Self::new(
            self.sheet,
            start_column,
            self.start_row,
            end_column,
            self.end_row,
        )
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> RangeCells {
        RangeCells {
            range: *self,
            current_row: self.start_row,
            current_column: self.start_column,
        }
    }

    /// Format as `A1:B10` (or `A1` for a single cell)
    pub fn to_a1_string(&self) -> String {
        if self.is_single_cell() {
            self.top_left().to_a1_string()
        } else {
            format!(
                "{}:{}",
                self.top_left().to_a1_string(),
                self.bottom_right().to_a1_string()
            )
        }
    }
}

impl fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl From<CellAddress> for RangeAddress {
    fn from(cell: CellAddress) -> Self {
        RangeAddress::single(cell)
    }
}

/// Iterator over cells in a range
pub struct RangeCells {
    range: RangeAddress,
    current_row: i32,
    current_column: i32,
}

impl Iterator for RangeCells {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end_row || self.range.start_column > self.range.end_column
        {
            return None;
        }

        let addr = CellAddress::new(self.range.sheet, self.current_column, self.current_row);

        self.current_column += 1;
        if self.current_column > self.range.end_column {
            self.current_column = self.range.start_column;
            self.current_row += 1;
        }

        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");

        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
        assert!(CellAddress::letters_to_column("XFE").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        assert_eq!(CellAddress::parse(0, "A1").unwrap(), CellAddress::new(0, 0, 0));
        assert_eq!(CellAddress::parse(2, "c7").unwrap(), CellAddress::new(2, 2, 6));
        assert_eq!(CellAddress::parse(0, "$B2").unwrap(), CellAddress::new(0, 1, 1));

        assert!(CellAddress::parse(0, "").is_err());
        assert!(CellAddress::parse(0, "A").is_err());
        assert!(CellAddress::parse(0, "7").is_err());
        assert!(CellAddress::parse(0, "A0").is_err());
        assert!(CellAddress::parse(0, "A1048577").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellAddress::new(0, 0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(0, 2, 99).to_string(), "C100");
        assert_eq!(CellAddress::new(0, -1, 3).to_string(), "R3C-1");
        assert_eq!(RangeAddress::new(0, 0, 4, 2, 7).to_string(), "A5:C8");
        assert_eq!(RangeAddress::single(CellAddress::new(0, 1, 1)).to_string(), "B2");
    }

    #[test]
    fn test_range_normalizes() {
        let range = RangeAddress::new(0, 3, 9, 1, 2);
        assert_eq!(range, RangeAddress::new(0, 1, 2, 3, 9));
        assert_eq!(range.row_count(), 8);
        assert_eq!(range.column_count(), 3);

        let parsed = RangeAddress::parse(0, "C10:B3").unwrap();
        assert_eq!(parsed, range);
    }

    #[test]
    fn test_range_contains() {
        let range = RangeAddress::parse(0, "B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(0, 1, 1)));
        assert!(range.contains(&CellAddress::new(0, 3, 3)));
        assert!(!range.contains(&CellAddress::new(0, 0, 0)));
        assert!(!range.contains(&CellAddress::new(1, 2, 2)));
    }

    #[test]
    fn test_offset_and_resize() {
        let range = RangeAddress::parse(0, "B2:C3").unwrap();

        assert_eq!(range.offset(3, 1), RangeAddress::parse(0, "C5:D6").unwrap());
        assert_eq!(range.offset(-1, -1), RangeAddress::parse(0, "A1:B2").unwrap());

        assert_eq!(range.resize(Some(5), None), RangeAddress::parse(0, "B2:C6").unwrap());
        assert_eq!(range.resize(None, Some(1)), RangeAddress::parse(0, "B2:B3").unwrap());
        assert_eq!(range.resize(None, None), range);
        assert_eq!(range.resize(Some(0), Some(-2)), range);
    }

    #[test]
    fn test_offset_overflow() {
        let far = CellAddress::new(0, i32::MAX, 4);
        assert_eq!(far.checked_offset(0, 1), None);
        assert_eq!(far.checked_offset(-4, -1), Some(CellAddress::new(0, i32::MAX - 1, 0)));
        assert_eq!(far.offset(0, 1).offset(0, -1), far);

        let range = RangeAddress::new(0, 0, i32::MAX - 1, 2, i32::MAX);
        assert_eq!(range.offset(5, 0).offset(-5, 0), range);
    }

    #[test]
    fn test_intersect() {
        let a = RangeAddress::parse(0, "A1:C3").unwrap();
        let b = RangeAddress::parse(0, "B2:D4").unwrap();
        assert_eq!(a.intersect(&b), Some(RangeAddress::parse(0, "B2:C3").unwrap()));

        let c = RangeAddress::parse(0, "E5:F6").unwrap();
        assert_eq!(a.intersect(&c), None);

        // Same coordinates on another sheet never intersect
        let d = RangeAddress::parse(1, "A1:C3").unwrap();
        assert_eq!(a.intersect(&d), None);
    }

    #[test]
    fn test_union() {
        let a = RangeAddress::parse(0, "A1:B2").unwrap();
        let b = RangeAddress::parse(0, "D5").unwrap();
        assert_eq!(a.union(&b), Some(RangeAddress::parse(0, "A1:D5").unwrap()));
        assert_eq!(a.union(&RangeAddress::parse(1, "D5").unwrap()), None);
    }

    #[test]
    fn test_range_cells() {
        let range = RangeAddress::parse(0, "A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0, 0),
                CellAddress::new(0, 1, 0),
                CellAddress::new(0, 0, 1),
                CellAddress::new(0, 1, 1),
            ]
        );
    }
}
