//! Plain text column writer

use crate::types::{Result, Row};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Write the selected columns of every row, space separated
fn write_rows<W: Write>(writer: &mut W, rows: &[Row], columns: &[usize]) -> Result<()> {
    for row in rows {
        let mut first = true;
        for &col in columns {
            if !first {
                writer.write_all(b" ")?;
            }
            // Debug keeps the trailing ".0" on integral values and round-trips exactly
            write!(writer, "{:?}", row[col])?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write rows to `output_path`, one line per row
#[instrument(skip(rows, columns), fields(output = %output_path.display()))]
pub fn write_columns(output_path: &Path, rows: &[Row], columns: &[usize]) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    write_rows(&mut writer, rows, columns)?;
    writer.flush()?;

    info!(rows = rows.len(), columns = columns.len(), "Write complete");
    Ok(())
}
