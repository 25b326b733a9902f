//! # calc-fields-csv
//!
//! CSV reader and writer for calc-fields documents.
//!
//! A CSV file maps onto one sheet of a [`MemoryDocument`](calc_fields_memory::MemoryDocument):
//! record `n` is row `n`, field `m` is column `m`. Cells keep their positions
//! on the way out, so addresses used on the command line stay valid.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
