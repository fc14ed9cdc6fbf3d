//! Printing and saving session results.

use anyhow::{Context, Result};
use quantfolio_core::types::CombinedTable;
use quantfolio_data::export::{to_csv_string, write_csv};
use quantfolio_monitor::{coverage_line, status_line};
use quantfolio_session::SessionView;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

use crate::cli::{OutputArgs, OutputFormat};

/// Fixed-width text rendering of a table; missing cells print as `-`.
pub fn render_table(table: &CombinedTable) -> String {
    let mut s = format!("{:<12}", "date");
    for symbol in &table.symbols {
        s.push_str(&format!("{:>10}", symbol));
    }
    s.push('\n');

    for row in &table.rows {
        s.push_str(&format!("{:<12}", row.date));
        for symbol in &table.symbols {
            match row.price(symbol) {
                Some(p) => s.push_str(&format!("{:>10.2}", p)),
                None => s.push_str(&format!("{:>10}", "-")),
            }
        }
        s.push('\n');
    }
    s
}

/// Print the view to stdout and save the table if requested.
pub fn emit(view: &SessionView, args: &OutputArgs) -> Result<()> {
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Csv => print!("{}", to_csv_string(&view.data)?),
        OutputFormat::Text => {
            println!("{}", status_line(view));
            println!("{}", coverage_line(&view.data));
            println!();
            print!("{}", render_table(&view.data));
        }
    }

    if let Some(path) = &args.save {
        if args.output == OutputFormat::Csv {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&view.data, BufWriter::new(file))?;
        } else {
            std::fs::write(path, view.data.to_json()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        info!(path = %path.display(), rows = view.data.len(), "table saved");
    }

    Ok(())
}
