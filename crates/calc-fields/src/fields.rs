//! Named-region ("field") directory
//!
//! A field is a named range used as an anchor into a form-like document.
//! Lookups always read the live reference position from the session, unless
//! the caller attaches a [`FieldCache`]. Every structural edit made through
//! this crate invalidates an attached cache, so a cached anchor never
//! outlives the row layout it was resolved against.

use ahash::AHashMap;
use tracing::debug;

use calc_fields_core::{CellAddress, Error, GridEditor, NamedRangeSource, Result};

use crate::insert::RowInserter;

/// A resolved field: a name bound to its anchor cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRegion {
    pub name: String,
    pub anchor: CellAddress,
}

impl NamedRegion {
    /// Sheet the field lies on
    pub fn sheet(&self) -> i32 {
        self.anchor.sheet
    }
}

/// Caller-owned memo of resolved fields
///
/// Keys are case-insensitive, like the names they stand for.
#[derive(Debug, Default, Clone)]
pub struct FieldCache {
    entries: AHashMap<String, NamedRegion>,
}

fn cache_key(name: &str) -> String {
    name.to_lowercase()
}

impl FieldCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached region for `name`
    pub fn get(&self, name: &str) -> Option<&NamedRegion> {
        self.entries.get(&cache_key(name))
    }

    fn insert(&mut self, region: NamedRegion) {
        self.entries.insert(cache_key(&region.name), region);
    }

    fn forget(&mut self, name: &str) {
        self.entries.remove(&cache_key(name));
    }

    /// Drop every cached region
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "field cache invalidated");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("field name is empty"));
    }
    Ok(())
}

/// Directory of the fields in a document session
pub struct Fields<'a, D> {
    doc: &'a mut D,
    cache: Option<&'a mut FieldCache>,
}

impl<'a, D: NamedRangeSource + GridEditor> Fields<'a, D> {
    /// Directory that always reads live positions
    pub fn new(doc: &'a mut D) -> Self {
        Self { doc, cache: None }
    }

    /// Directory that memoizes lookups in `cache`
    pub fn with_cache(doc: &'a mut D, cache: &'a mut FieldCache) -> Self {
        Self {
            doc,
            cache: Some(cache),
        }
    }

    /// Resolve `name` to its anchor
    ///
    /// Returns `Ok(None)` for an unknown name.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an empty name; session errors pass
    /// through.
    pub fn resolve(&mut self, name: &str) -> Result<Option<NamedRegion>> {
        check_name(name)?;

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(name)) {
            return Ok(Some(hit.clone()));
        }

        let region = self
            .doc
            .reference_position(name)?
            .map(|anchor| NamedRegion {
                name: name.to_string(),
                anchor,
            });

        if let (Some(cache), Some(region)) = (self.cache.as_deref_mut(), &region) {
            cache.insert(region.clone());
        }
        Ok(region)
    }

    /// Number of fields in the document
    pub fn count(&self) -> Result<usize> {
        self.doc.named_range_count()
    }

    /// Define a field `name` referring to `content` (e.g. `$A$5` or `A5:C5`),
    /// relative to `anchor`
    pub fn add(&mut self, name: &str, content: &str, anchor: CellAddress) -> Result<()> {
        check_name(name)?;
        if !anchor.is_valid() {
            return Err(Error::invalid_argument(format!(
                "anchor {:?} has a negative index",
                anchor
            )));
        }

        self.doc.add_named_range(name, content, anchor)?;
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.forget(name);
        }
        Ok(())
    }

    /// Remove a field, returning whether it existed
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        check_name(name)?;

        if let Some(cache) = self.cache.as_deref_mut() {
            cache.forget(name);
        }
        self.doc.remove_named_range(name)
    }

    /// Handle to the field `name`, or `None` if it does not exist
    pub fn field(&mut self, name: &str) -> Result<Option<Field<'_, D>>> {
        let region = match self.resolve(name)? {
            Some(region) => region,
            None => return Ok(None),
        };

        Ok(Some(Field {
            doc: &mut *self.doc,
            cache: self.cache.as_deref_mut(),
            region,
        }))
    }

    /// Clear the attached cache, if any
    pub fn invalidate(&mut self) {
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.invalidate();
        }
    }
}

/// A field bound to its document session
pub struct Field<'a, D> {
    doc: &'a mut D,
    cache: Option<&'a mut FieldCache>,
    region: NamedRegion,
}

impl<'a, D: NamedRangeSource + GridEditor> Field<'a, D> {
    pub fn name(&self) -> &str {
        &self.region.name
    }

    /// Anchor cell as of the last resolution
    pub fn anchor(&self) -> CellAddress {
        self.region.anchor
    }

    pub fn region(&self) -> &NamedRegion {
        &self.region
    }

    fn offset(&self, column: i32, row: i32) -> Result<CellAddress> {
        self.region
            .anchor
            .checked_offset(row, column)
            .filter(CellAddress::is_valid)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "offset ({}, {}) from {} leaves the sheet",
                    column, row, self.region.anchor
                ))
            })
    }

    /// Display string of the cell `column`/`row` away from the anchor
    pub fn value(&self, column: i32, row: i32) -> Result<String> {
        let at = self.offset(column, row)?;
        Ok(self.doc.cell(at)?.to_string())
    }

    /// Write text into the cell `column`/`row` away from the anchor
    pub fn set_value(&mut self, value: &str, column: i32, row: i32) -> Result<()> {
        let at = self.offset(column, row)?;
        self.doc.set_cell_string(at, value)
    }

    /// Insert `group_count` groups of `stride` rows below the anchor, copying
    /// `template_width` columns of the template row into each group
    ///
    /// See [`RowInserter::insert_rows`]. On success the attached cache is
    /// invalidated and the anchor is re-read from the live reference
    /// position.
    pub fn insert_rows(&mut self, group_count: i32, stride: i32, template_width: i32) -> Result<bool> {
        let inserted = RowInserter::new(&mut *self.doc).insert_rows(
            self.region.anchor,
            group_count,
            stride,
            template_width,
        )?;
        if !inserted {
            return Ok(false);
        }

        if let Some(cache) = self.cache.as_deref_mut() {
            cache.invalidate();
        }
        match self.doc.reference_position(&self.region.name)? {
            Some(anchor) => self.region.anchor = anchor,
            None => debug!(name = %self.region.name, "field vanished after insertion"),
        }
        Ok(true)
    }
}
