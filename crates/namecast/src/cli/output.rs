//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use namecast::sink::ErrorRecord;
use serde::Serialize;

/// A recorded error as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedError {
    pub kind: String,
    pub message: String,
}

impl From<&ErrorRecord> for ReportedError {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            kind: record.kind.to_string(),
            message: record.message.clone(),
        }
    }
}

pub fn reported_errors(records: &[ErrorRecord]) -> Vec<ReportedError> {
    records.iter().map(ReportedError::from).collect()
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
