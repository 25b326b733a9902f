//! # calc-fields
//!
//! Structural edits for spreadsheet documents driven through a host session.
//!
//! calc-fields locates named regions ("fields") in a document, inserts
//! templated rows below them, and inserts or removes rows of a selected list
//! without breaking the merged cells around it.
//!
//! ## Features
//!
//! - Named-field lookup with an optional caller-owned cache
//! - Templated row insertion with groups and strides
//! - Merge-safe list row insertion and removal, dragging formulas down
//! - Typed cell access per sheet
//! - An in-memory document session and CSV import/export (`csv` feature)
//!
//! Every component borrows a session implementing the collaborator traits of
//! [`calc_fields_core::session`]; [`MemoryDocument`] is the in-memory one.
//!
//! ## Example
//!
//! ```rust
//! use calc_fields::prelude::*;
//!
//! let mut doc = MemoryDocument::with_sheet("Sheet1");
//! doc.define_name("Header", RangeAddress::parse(0, "A5").unwrap()).unwrap();
//! doc.set_cell_string(CellAddress::parse(0, "B6").unwrap(), "F1.1").unwrap();
//!
//! let mut fields = Fields::new(&mut doc);
//! let mut header = fields.field("Header").unwrap().unwrap();
//!
//! // One group of two rows below the anchor, template copied into the first
//! assert!(header.insert_rows(1, 2, 3).unwrap());
//! assert_eq!(header.value(1, 1).unwrap(), "F1.1");
//! assert_eq!(header.value(1, 3).unwrap(), "F1.1");
//! ```

pub mod fields;
pub mod insert;
pub mod list;
pub mod merge;
pub mod prelude;
pub mod sheet;

pub use fields::{Field, FieldCache, Fields, NamedRegion};
pub use insert::{
    RowInserter, TemplateBlock, DEFAULT_GROUP_COUNT, DEFAULT_STRIDE, DEFAULT_TEMPLATE_WIDTH,
};
pub use list::{ListArea, ListEditConfig, ListEditor};
pub use merge::{MergeTracker, MergedRange, TrackerState};
pub use sheet::{Sheet, Sheets};

// Re-export core types
pub use calc_fields_core::{
    session, CellAccess, CellAddress, CellContent, ContentKind, DocumentSession, Error,
    FillDirection, FillMode, GridEditor, MergeControl, NamedRangeSource, RangeAddress, ReadAs,
    Result, SelectionControl, SheetControl, SheetSettings, MAX_COLS, MAX_ROWS,
};

// Re-export the in-memory session
pub use calc_fields_memory::{MemoryDocument, SessionOp};

// Re-export CSV types
#[cfg(feature = "csv")]
pub use calc_fields_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter, LineTerminator,
};
