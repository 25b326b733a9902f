//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use calc_fields_core::Error;
use calc_fields_memory::MemoryDocument;

use crate::error::CsvResult;
use crate::options::CsvWriteOptions;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write one sheet of a document to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        doc: &MemoryDocument,
        sheet: i32,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(doc, sheet, file, options)
    }

    /// Write one sheet of a document to a writer
    ///
    /// Output always starts at `A1` and runs to the last used row and column,
    /// so blank leading rows and columns are kept.
    pub fn write<W: Write>(
        doc: &MemoryDocument,
        sheet: i32,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let sheet = doc
            .sheet(sheet)
            .ok_or_else(|| Error::not_found(format!("sheet {}", sheet)))?;

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(options.line_terminator.to_csv())
            .from_writer(writer);

        if let Some((_, _, max_row, max_col)) = sheet.cells().used_bounds() {
            for row in 0..=max_row {
                let record: Vec<String> = (0..=max_col)
                    .map(|col| sheet.content_at(row, col).to_string())
                    .collect();

                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
