//! Prelude module - common imports for calc-fields users
//!
//! ```rust
//! use calc_fields::prelude::*;
//! ```

pub use crate::{
    // Address types
    CellAddress,
    // Cell types
    CellContent,
    ReadAs,
    RangeAddress,

    // Collaborator traits
    CellAccess,
    DocumentSession,
    GridEditor,
    MergeControl,
    NamedRangeSource,
    SelectionControl,
    SheetControl,
    SheetSettings,

    // Error types
    Error,
    Result,

    // Fields
    Field,
    FieldCache,
    Fields,

    // Structural edits
    FillMode,
    ListEditConfig,
    ListEditor,
    RowInserter,

    Sheet,
    Sheets,

    // In-memory session
    MemoryDocument,
};

#[cfg(feature = "csv")]
pub use crate::{CsvReader, CsvWriter};
