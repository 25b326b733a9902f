//! # calc-fields-memory
//!
//! An in-memory document session for calc-fields.
//!
//! [`MemoryDocument`] implements every collaborator trait of
//! `calc_fields_core::session`: sparse cell storage per sheet, merged regions,
//! case-insensitive named ranges that follow row edits, a selection and the
//! "expand references" setting. It backs the test suites and the `cfields`
//! command-line tool.
//!
//! Failures of a live host can be reproduced with [`MemoryDocument::dispose`]
//! and [`MemoryDocument::fail_on`].

mod document;
pub mod names;
mod sheet;
pub mod storage;

pub use document::{MemoryDocument, SessionOp};
pub use names::{NamedRange, NamedRangeTable};
pub use sheet::MemorySheet;
pub use storage::CellStorage;
