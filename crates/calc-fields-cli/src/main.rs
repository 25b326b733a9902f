//! calc-fields CLI - field lookups and list edits on CSV sheets

use anyhow::{bail, Context, Result};
use calc_fields::prelude::*;
use calc_fields::{
    CsvReadOptions, CsvWriteOptions, DEFAULT_GROUP_COUNT, DEFAULT_STRIDE, DEFAULT_TEMPLATE_WIDTH,
};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cfields")]
#[command(
    author,
    version,
    about = "Named-field lookups and merge-safe list edits on CSV sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input document and the names, merges and output that go with it
#[derive(Args)]
struct DocArgs {
    /// Input CSV file
    input: PathBuf,

    /// Define a named range, e.g. `Header=$A$5` (repeatable)
    #[arg(short, long = "name", value_name = "NAME=REF")]
    names: Vec<String>,

    /// Merge a range, e.g. `A3:C4` (repeatable)
    #[arg(short, long = "merge", value_name = "RANGE")]
    merges: Vec<String>,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter (default: comma)
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert templated rows below a field
    InsertRows {
        #[command(flatten)]
        doc: DocArgs,

        /// Field to insert below
        #[arg(short, long)]
        field: String,

        /// Number of groups to insert
        #[arg(short, long, default_value_t = DEFAULT_GROUP_COUNT)]
        groups: i32,

        /// Rows per group
        #[arg(long, default_value_t = DEFAULT_STRIDE)]
        stride: i32,

        /// Columns of the template row copied into each group
        #[arg(short, long, default_value_t = DEFAULT_TEMPLATE_WIDTH)]
        width: i32,
    },

    /// Insert blank rows into the list at the selection
    InsertList {
        #[command(flatten)]
        doc: DocArgs,

        /// Selected rows, e.g. `A5:A6`
        #[arg(short, long)]
        select: String,

        /// Do not drag formulas of the row above into the new rows
        #[arg(long)]
        no_drag: bool,
    },

    /// Remove the selected rows from the list
    RemoveList {
        #[command(flatten)]
        doc: DocArgs,

        /// Selected rows, e.g. `A5:A6`
        #[arg(short, long)]
        select: String,
    },

    /// Print the value of a cell relative to a field
    Value {
        #[command(flatten)]
        doc: DocArgs,

        /// Field name
        #[arg(short, long)]
        field: String,

        /// Column offset from the field's anchor
        #[arg(short, long, default_value = "0")]
        column: i32,

        /// Row offset from the field's anchor
        #[arg(short, long, default_value = "0")]
        row: i32,
    },

    /// List the defined fields and their anchors
    Fields {
        #[command(flatten)]
        doc: DocArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InsertRows {
            doc,
            field,
            groups,
            stride,
            width,
        } => insert_rows(&doc, &field, groups, stride, width),
        Commands::InsertList {
            doc,
            select,
            no_drag,
        } => insert_list(&doc, &select, !no_drag),
        Commands::RemoveList { doc, select } => remove_list(&doc, &select),
        Commands::Value {
            doc,
            field,
            column,
            row,
        } => show_value(&doc, &field, column, row),
        Commands::Fields { doc } => list_fields(&doc),
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{}' is not an ASCII character", delimiter))
}

/// Read the input and apply the `--name` and `--merge` options
fn open(args: &DocArgs) -> Result<MemoryDocument> {
    let options = CsvReadOptions {
        delimiter: delimiter_byte(args.delimiter)?,
        ..Default::default()
    };
    let mut doc = CsvReader::read_file(&args.input, &options)
        .with_context(|| format!("Failed to open '{}'", args.input.display()))?;

    for definition in &args.names {
        let (name, reference) = definition
            .split_once('=')
            .with_context(|| format!("Expected NAME=REF, got '{}'", definition))?;
        Fields::new(&mut doc)
            .add(name.trim(), reference.trim(), CellAddress::new(0, 0, 0))
            .with_context(|| format!("Failed to define '{}'", name))?;
    }

    for merge in &args.merges {
        let range = RangeAddress::parse(0, merge)
            .with_context(|| format!("Invalid range '{}'", merge))?;
        doc.merge(range)
            .with_context(|| format!("Failed to merge '{}'", merge))?;
    }

    Ok(doc)
}

fn save(doc: &MemoryDocument, args: &DocArgs) -> Result<()> {
    let options = CsvWriteOptions {
        delimiter: delimiter_byte(args.delimiter)?,
        ..Default::default()
    };

    if let Some(output_path) = &args.output {
        CsvWriter::write_file(doc, 0, output_path, &options)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote '{}'", output_path.display());
    } else {
        CsvWriter::write(doc, 0, io::stdout().lock(), &options)
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn report_merges(doc: &MemoryDocument) {
    let merged = doc.merged_regions(0);
    if !merged.is_empty() {
        let list: Vec<String> = merged.iter().map(|r| r.to_string()).collect();
        eprintln!("Merged: {}", list.join(", "));
    }
}

fn insert_rows(args: &DocArgs, field: &str, groups: i32, stride: i32, width: i32) -> Result<()> {
    let mut doc = open(args)?;

    let mut fields = Fields::new(&mut doc);
    let mut handle = match fields.field(field)? {
        Some(handle) => handle,
        None => bail!("Field '{}' not found", field),
    };
    let anchor = handle.anchor();
    if !handle
        .insert_rows(groups, stride, width)
        .with_context(|| format!("Failed to insert rows below '{}'", field))?
    {
        bail!("Sheet of field '{}' not found", field);
    }

    eprintln!(
        "Inserted {} rows below {} ({} groups of {})",
        groups * stride,
        anchor,
        groups,
        stride
    );
    save(&doc, args)
}

fn select(doc: &mut MemoryDocument, selection: &str) -> Result<()> {
    let range = RangeAddress::parse(0, selection)
        .with_context(|| format!("Invalid selection '{}'", selection))?;
    doc.select(&[range])?;
    Ok(())
}

fn insert_list(args: &DocArgs, selection: &str, drag_formulas: bool) -> Result<()> {
    let mut doc = open(args)?;
    select(&mut doc, selection)?;

    let config = ListEditConfig {
        drag_formulas,
        ..Default::default()
    };
    let inserted = ListEditor::with_config(&mut doc, config)
        .insert_list_rows()
        .context("Failed to insert list rows")?;
    if !inserted {
        bail!("No list at '{}'", selection);
    }

    eprintln!("Inserted list rows at {}", selection);
    report_merges(&doc);
    save(&doc, args)
}

fn remove_list(args: &DocArgs, selection: &str) -> Result<()> {
    let mut doc = open(args)?;
    select(&mut doc, selection)?;

    let removed = ListEditor::new(&mut doc)
        .remove_list_rows()
        .context("Failed to remove list rows")?;
    if !removed {
        bail!("No list at '{}'", selection);
    }

    eprintln!("Removed list rows at {}", selection);
    report_merges(&doc);
    save(&doc, args)
}

fn show_value(args: &DocArgs, field: &str, column: i32, row: i32) -> Result<()> {
    let mut doc = open(args)?;
    let mut fields = Fields::new(&mut doc);

    let handle = match fields.field(field)? {
        Some(handle) => handle,
        None => bail!("Field '{}' not found", field),
    };
    println!("{}", handle.value(column, row)?);
    Ok(())
}

fn list_fields(args: &DocArgs) -> Result<()> {
    let doc = open(args)?;
    print_fields(&doc, &args.input)
}

fn print_fields(doc: &MemoryDocument, input: &Path) -> Result<()> {
    println!("File: {}", input.display());
    println!("Fields: {}", doc.named_range_count()?);

    for name in doc.names() {
        println!("  {}\t{}", name.name, name.refers_to);
    }
    Ok(())
}
