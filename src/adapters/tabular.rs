//! Delimited-text adapter: reads uploaded batch files and writes prediction
//! exports using the `csv` crate.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::Table;
use crate::ClaimGuardError;

/// Parse delimited text with a header row into a `Table`.
///
/// Header names are trimmed; cell text is kept verbatim.
///
/// # Errors
/// Returns error on malformed input, rows of the wrong width or duplicate
/// header names.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, ClaimGuardError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers)?;

    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect())?;
    }

    Ok(table)
}

/// Read a batch file from disk.
///
/// # Errors
/// Returns error if the file cannot be opened or parsed.
pub fn read_table_path(path: &Path, delimiter: u8) -> Result<Table, ClaimGuardError> {
    let file = File::open(path)?;
    let table = read_table(file, delimiter)?;
    tracing::debug!(
        "Read {} rows x {} columns from {:?}",
        table.row_count(),
        table.columns().len(),
        path
    );
    Ok(table)
}

/// Write `table` as UTF-8, comma-separated text with a header row.
///
/// # Errors
/// Returns error if writing fails.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<(), ClaimGuardError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export `table` to `path`, replacing any existing file.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_table_path(path: &Path, table: &Table) -> Result<(), ClaimGuardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_table(file, table)?;
    tracing::info!("Exported {} rows to {:?}", table.row_count(), path);
    Ok(())
}
