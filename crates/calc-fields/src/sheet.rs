//! Sheet-level typed cell access

use tracing::info;

use calc_fields_core::{
    CellAccess, CellAddress, CellContent, Error, ReadAs, Result, SheetControl,
};

/// The sheets of a document session
pub struct Sheets<'a, D> {
    doc: &'a mut D,
}

impl<'a, D: CellAccess> Sheets<'a, D> {
    pub fn new(doc: &'a mut D) -> Self {
        Self { doc }
    }

    /// Number of sheets in the document
    pub fn count(&self) -> Result<i32> {
        self.doc.sheet_count()
    }

    /// Sheet at `index`, or `None` past the last sheet
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative index.
    pub fn sheet(&mut self, index: i32) -> Result<Option<Sheet<'_, D>>> {
        if index < 0 {
            return Err(Error::invalid_argument(format!(
                "negative sheet index {}",
                index
            )));
        }
        if !self.doc.has_sheet(index)? {
            return Ok(None);
        }
        Ok(Some(Sheet {
            doc: &mut *self.doc,
            index,
        }))
    }

    /// Sheet called `name` (case-insensitive), or `None`
    pub fn sheet_by_name(&mut self, name: &str) -> Result<Option<Sheet<'_, D>>> {
        if name.is_empty() {
            return Err(Error::invalid_argument("sheet name is empty"));
        }
        let index = match self.doc.find_sheet(name)? {
            Some(index) => index,
            None => return Ok(None),
        };
        Ok(Some(Sheet {
            doc: &mut *self.doc,
            index,
        }))
    }
}

impl<'a, D: SheetControl> Sheets<'a, D> {
    /// Insert an empty sheet called `name` at `index`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an empty name or a negative index; the
    /// session rejects duplicate names and indices past the end.
    pub fn insert_sheet(&mut self, name: &str, index: i32) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_argument("sheet name is empty"));
        }
        if index < 0 {
            return Err(Error::invalid_argument(format!(
                "negative sheet index {}",
                index
            )));
        }
        self.doc.insert_sheet(name, index)?;
        info!(sheet = name, index, "inserted sheet");
        Ok(())
    }

    /// Remove the sheet called `name`, returning whether it existed
    pub fn remove_sheet(&mut self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(Error::invalid_argument("sheet name is empty"));
        }
        let removed = self.doc.remove_sheet(name)?;
        if removed {
            info!(sheet = name, "removed sheet");
        }
        Ok(removed)
    }
}

/// One sheet of a document session
#[derive(Debug)]
pub struct Sheet<'a, D> {
    doc: &'a mut D,
    index: i32,
}

impl<'a, D: CellAccess> Sheet<'a, D> {
    pub fn index(&self) -> i32 {
        self.index
    }

    fn at(&self, column: i32, row: i32) -> Result<CellAddress> {
        let at = CellAddress::new(self.index, column, row);
        if !at.is_valid() {
            return Err(Error::invalid_argument(format!(
                "negative cell index ({}, {})",
                column, row
            )));
        }
        Ok(at)
    }

    /// Write `value` into the cell at `column`/`row`
    ///
    /// Text is stored as a formula when `is_formula` is set; numbers are
    /// always stored as values and `Empty` clears the cell.
    pub fn set_cell_value_by_index(
        &mut self,
        value: CellContent,
        column: i32,
        row: i32,
        is_formula: bool,
    ) -> Result<()> {
        let at = self.at(column, row)?;
        match value {
            CellContent::Empty => self.doc.set_cell_string(at, ""),
            CellContent::Number(n) => self.doc.set_cell_value(at, n),
            CellContent::Formula(f) => self.doc.set_cell_formula(at, &f),
            CellContent::String(s) if is_formula => self.doc.set_cell_formula(at, &s),
            CellContent::String(s) => self.doc.set_cell_string(at, &s),
        }
    }

    /// Read the cell at `column`/`row`, coerced as `mode` asks
    pub fn cell_value_by_index(&self, column: i32, row: i32, mode: ReadAs) -> Result<CellContent> {
        let at = self.at(column, row)?;
        Ok(self.doc.cell(at)?.read_as(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_fields_memory::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn doc() -> MemoryDocument {
        let mut doc = MemoryDocument::with_sheet("Sheet1");
        doc.add_sheet("Data");
        doc
    }

    #[test]
    fn test_lookup() {
        let mut doc = doc();
        let mut sheets = Sheets::new(&mut doc);

        assert_eq!(sheets.count().unwrap(), 2);
        assert_eq!(sheets.sheet(1).unwrap().unwrap().index(), 1);
        assert!(sheets.sheet(2).unwrap().is_none());
        assert!(sheets.sheet(-1).unwrap_err().is_invalid_argument());

        assert_eq!(sheets.sheet_by_name("data").unwrap().unwrap().index(), 1);
        assert!(sheets.sheet_by_name("Missing").unwrap().is_none());
        assert!(sheets.sheet_by_name("").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut doc = doc();
        let mut sheets = Sheets::new(&mut doc);

        sheets.insert_sheet("Summary", 1).unwrap();
        assert_eq!(sheets.count().unwrap(), 3);
        assert_eq!(sheets.sheet_by_name("summary").unwrap().unwrap().index(), 1);
        assert_eq!(sheets.sheet_by_name("Data").unwrap().unwrap().index(), 2);

        assert!(sheets.insert_sheet("", 0).unwrap_err().is_invalid_argument());
        assert!(sheets.insert_sheet("Other", -1).unwrap_err().is_invalid_argument());
        assert!(sheets.insert_sheet("DATA", 0).unwrap_err().is_invalid_argument());

        assert!(sheets.remove_sheet("Summary").unwrap());
        assert!(!sheets.remove_sheet("Summary").unwrap());
        assert!(sheets.remove_sheet("").unwrap_err().is_invalid_argument());
        assert_eq!(sheets.sheet_by_name("Data").unwrap().unwrap().index(), 1);
    }

    #[test]
    fn test_typed_access() {
        let mut doc = doc();
        let mut sheets = Sheets::new(&mut doc);
        let mut sheet = sheets.sheet_by_name("Data").unwrap().unwrap();

        sheet
            .set_cell_value_by_index(CellContent::Number(4.0), 0, 0, false)
            .unwrap();
        sheet
            .set_cell_value_by_index(CellContent::from("A1*2"), 1, 0, true)
            .unwrap();
        sheet
            .set_cell_value_by_index(CellContent::from("note"), 2, 0, false)
            .unwrap();

        assert_eq!(
            sheet.cell_value_by_index(0, 0, ReadAs::Auto).unwrap(),
            CellContent::Number(4.0)
        );
        assert_eq!(
            sheet.cell_value_by_index(1, 0, ReadAs::Auto).unwrap(),
            CellContent::formula("=A1*2")
        );
        assert_eq!(
            sheet.cell_value_by_index(2, 0, ReadAs::Value).unwrap(),
            CellContent::Number(0.0)
        );
        assert_eq!(
            sheet.cell_value_by_index(0, 0, ReadAs::String).unwrap(),
            CellContent::from("4")
        );

        sheet
            .set_cell_value_by_index(CellContent::Empty, 2, 0, false)
            .unwrap();
        assert_eq!(
            sheet.cell_value_by_index(2, 0, ReadAs::Auto).unwrap(),
            CellContent::Empty
        );

        assert!(sheet
            .cell_value_by_index(-1, 0, ReadAs::Auto)
            .unwrap_err()
            .is_invalid_argument());
        assert_eq!(doc.get(CellAddress::new(0, 0, 0)), CellContent::Empty);
    }
}
