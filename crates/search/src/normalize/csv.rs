//! CSV normalization path (legacy model output format).
//!
//! The model sometimes answers with a comma-separated table under a fixed
//! Turkish header row instead of JSON. Fields may be quoted (doubled quotes
//! escape), and addresses frequently contain unescaped commas, which breaks
//! the column count. Rows with a wrong column count are repaired by
//! re-splitting the raw line and merging the overflow back into the address
//! column; rows that still disagree are padded or truncated to fit.

use crate::record::{normalize_key, Business, Field, NOT_AVAILABLE};
use localfind_core::{AppError, AppResult};

/// Whether the text starts with the known CSV header row.
pub fn looks_like_csv(text: &str) -> bool {
    let Some(first_line) = text.lines().find(|l| !l.trim().is_empty()) else {
        return false;
    };
    let normalized = normalize_key(first_line);
    normalized.contains("işletmeadı") && normalized.contains("adres")
}

/// Parse CSV text into business records.
///
/// The header row must contain every known column (extra columns are
/// ignored). A header-only reply yields zero records.
pub fn parse_csv_records(text: &str) -> AppResult<Vec<Business>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        return Ok(Vec::new());
    }

    let headers: Vec<String> = parse_line(lines[0])
        .iter()
        .map(|h| strip_outer_quotes(h.trim()).to_string())
        .collect();
    let columns: Vec<Option<Field>> = headers.iter().map(|h| Field::from_header(h)).collect();

    for field in Field::ALL {
        if !columns.contains(&Some(field)) {
            return Err(AppError::Malformed(format!(
                "CSV header is missing the '{}' column",
                field.csv_header()
            )));
        }
    }

    let header_count = headers.len();
    let address_index = columns
        .iter()
        .position(|c| *c == Some(Field::Address))
        .ok_or_else(|| AppError::Malformed("CSV header is missing the address column".to_string()))?;

    let mut records = Vec::with_capacity(lines.len() - 1);

    for line in &lines[1..] {
        let mut values = parse_line(line);

        if values.len() != header_count {
            match repair_row(line, header_count, address_index) {
                Some(repaired) => values = repaired,
                None => tracing::warn!("CSV repair heuristic failed for line: {}", line),
            }
        }

        // Last resort: force the row to the header width
        while values.len() < header_count {
            values.push(NOT_AVAILABLE.to_string());
        }
        values.truncate(header_count);

        let mut record = Business::default();
        for (index, column) in columns.iter().enumerate() {
            if let Some(field) = column {
                let cleaned = strip_outer_quotes(values[index].trim());
                let value = if cleaned.is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    cleaned.to_string()
                };
                record.set(*field, value);
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Split one CSV line, honoring quoted fields and doubled-quote escapes.
fn parse_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    values.push(current);
    values
}

/// Column-count repair for rows whose address contains unescaped commas.
///
/// Re-splits the raw line on every comma; when that yields too many cells,
/// the overflow almost always sits inside the address, so those cells are
/// merged back into one address value.
fn repair_row(line: &str, header_count: usize, address_index: usize) -> Option<Vec<String>> {
    let simple: Vec<&str> = line.split(',').collect();
    if simple.len() <= header_count {
        return None;
    }

    let overflow = simple.len() - header_count;
    let address = simple[address_index..=address_index + overflow]
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(", ");

    let mut corrected: Vec<String> = Vec::with_capacity(header_count);
    corrected.extend(simple[..address_index].iter().map(|s| s.to_string()));
    corrected.push(address);
    corrected.extend(
        simple[address_index + overflow + 1..]
            .iter()
            .map(|s| s.to_string()),
    );

    if corrected.len() == header_count {
        Some(corrected)
    } else {
        None
    }
}

/// Strip one pair of surrounding double quotes, if present.
fn strip_outer_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
