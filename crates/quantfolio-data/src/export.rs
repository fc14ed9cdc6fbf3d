//! Combined table export.

use csv::WriterBuilder;
use quantfolio_core::types::CombinedTable;
use std::io::Write;

/// Write the table as CSV: `date,<symbols...>`, prices with 2 decimals and
/// empty cells for missing values.
pub fn write_csv<W: Write>(table: &CombinedTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    let mut header = Vec::with_capacity(table.symbols.len() + 1);
    header.push("date".to_string());
    header.extend(table.symbols.iter().cloned());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.date.format("%Y-%m-%d").to_string());
        for symbol in &table.symbols {
            record.push(row.price(symbol).map(|p| format!("{:.2}", p)).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the table as a CSV string.
pub fn to_csv_string(table: &CombinedTable) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
