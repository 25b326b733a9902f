//! Dialect and typing switches for CSV import/export

/// How records are split and how fields become cell content
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// The single sheet the document is created with
    pub sheet_name: String,
    /// Fields that parse as `f64` become numbers; otherwise everything is text
    pub auto_detect_types: bool,
    /// Fields like `=A1*2` become formulas (a lone `=` stays text)
    pub formulas: bool,
}

impl CsvReadOptions {
    /// Default options with a different field separator, e.g. `b';'`
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            sheet_name: "Sheet1".to_string(),
            auto_detect_types: true,
            formulas: true,
        }
    }
}

/// Dialect used when a sheet is written back out
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub quote: u8,
    pub line_terminator: LineTerminator,
}

impl CsvWriteOptions {
    /// Default options with a different field separator
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Record separator written after each row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    LF,
    CRLF,
}

impl LineTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        }
    }
}
