//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calc_fields_core::{CellAddress, CellContent};
use calc_fields_memory::MemoryDocument;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a single-sheet document
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &CsvReadOptions,
    ) -> CsvResult<MemoryDocument> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a single-sheet document
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<MemoryDocument> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut doc = MemoryDocument::with_sheet(options.sheet_name.as_str());

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;

            for (col, field) in record.iter().enumerate() {
                let content = Self::detect_type(field, options);
                if !content.is_empty() {
                    doc.set(CellAddress::new(0, col as i32, row as i32), content)?;
                }
            }
        }

        Ok(doc)
    }

    /// Classify a field as empty, formula, number or text
    fn detect_type(field: &str, options: &CsvReadOptions) -> CellContent {
        if field.trim().is_empty() {
            return CellContent::Empty;
        }

        if options.formulas && field.starts_with('=') && field.len() > 1 {
            return CellContent::Formula(field.to_string());
        }

        if options.auto_detect_types {
            if let Ok(n) = field.trim().parse::<f64>() {
                return CellContent::Number(n);
            }
        }

        CellContent::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_type() {
        let options = CsvReadOptions::default();
        assert_eq!(CsvReader::detect_type("", &options), CellContent::Empty);
        assert_eq!(CsvReader::detect_type(" 12.5 ", &options), CellContent::Number(12.5));
        assert_eq!(
            CsvReader::detect_type("=A1+1", &options),
            CellContent::Formula("=A1+1".into())
        );
        assert_eq!(CsvReader::detect_type("=", &options), CellContent::from("="));
        assert_eq!(CsvReader::detect_type("F1.1", &options), CellContent::from("F1.1"));

        let raw = CsvReadOptions {
            auto_detect_types: false,
            formulas: false,
            ..Default::default()
        };
        assert_eq!(CsvReader::detect_type("12", &raw), CellContent::from("12"));
        assert_eq!(CsvReader::detect_type("=A1", &raw), CellContent::from("=A1"));
    }
}
