//! # calc-fields-core
//!
//! Core types for the calc-fields spreadsheet editing library.
//!
//! This crate provides the fundamental types used throughout calc-fields:
//! - [`CellAddress`] and [`RangeAddress`] - Sheet-aware addressing and range arithmetic
//! - [`CellContent`] - Cell content (numbers, text, formulas)
//! - [`Error`] - The error taxonomy shared by every component
//! - [`session`] - Collaborator traits a document session implements
//!
//! ## Example
//!
//! ```rust
//! use calc_fields_core::{CellAddress, RangeAddress};
//!
//! let list = RangeAddress::parse(0, "A5:C8").unwrap();
//! let below = list.offset(4, 0).resize(Some(1), None);
//! assert_eq!(below.to_string(), "A9:C9");
//!
//! assert!(list.contains(&CellAddress::parse(0, "B6").unwrap()));
//! assert_eq!(list.intersect(&below), None);
//! ```

pub mod address;
pub mod content;
pub mod error;
pub mod session;

pub use address::{CellAddress, RangeAddress, RangeCells};
pub use content::{CellContent, ContentKind, ReadAs};
pub use error::{Error, Result};
pub use session::{
    CellAccess, DocumentSession, FillDirection, FillMode, GridEditor, MergeControl,
    NamedRangeSource, SelectionControl, SheetControl, SheetSettings,
};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: i32 = 1_048_576;

/// Maximum number of columns in a sheet
pub const MAX_COLS: i32 = 16_384;
