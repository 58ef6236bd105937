//! CSV export for projection rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::types::ProjectionRow;

/// Column header for CSV projection export.
pub const HEADER: &str = "year,utility_annual,ppa_annual,purchase_annual,\
                      utility_cumulative,ppa_cumulative,purchase_cumulative";

/// Exports projection rows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per year. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `rows` - Projection rows, year 1 first
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[ProjectionRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes projection rows as CSV to any writer.
///
/// # Arguments
///
/// * `rows` - Projection rows, year 1 first
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[ProjectionRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows, money to the cent
    for r in rows {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.2}", r.utility_annual),
            format!("{:.2}", r.ppa_annual),
            format!("{:.2}", r.purchase_annual),
            format!("{:.2}", r.utility_cumulative),
            format!("{:.2}", r.ppa_cumulative),
            format!("{:.2}", r.purchase_cumulative),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
