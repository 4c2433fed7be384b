//! CSV export of normalized records.
//!
//! Output uses the English column labels and RFC 4180 quoting: a cell is
//! quoted when it contains a comma, a double quote, or a newline, and inner
//! quotes are doubled.

use crate::record::{Business, Field};

/// Render records as a CSV document, header row first.
pub fn to_csv(records: &[Business]) -> String {
    let mut out = String::new();

    let header: Vec<String> = Field::ALL.iter().map(|f| escape_cell(f.label())).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for record in records {
        let row: Vec<String> = Field::ALL
            .iter()
            .map(|f| escape_cell(record.get(*f)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
