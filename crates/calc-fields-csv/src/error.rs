//! Errors raised while loading or saving a sheet as CSV

use thiserror::Error;

pub type CsvResult<T> = std::result::Result<T, CsvError>;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("cannot access CSV data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The document rejected a cell or sheet access
    #[error("document error: {0}")]
    Core(#[from] calc_fields_core::Error),
}
