//! Column sorting for rendered results.
//!
//! Sorting is stable and `N/A` cells always sink to the bottom, in both
//! ascending and descending order. When both cells parse as numbers the
//! comparison is numeric (so "120" sorts after "15"); otherwise it falls
//! back to a case-insensitive string comparison.

use crate::record::{Business, Field, NOT_AVAILABLE};
use std::cmp::Ordering;

/// Sort records in place by one column.
pub fn sort_records(records: &mut [Business], field: Field, descending: bool) {
    records.sort_by(|a, b| compare_cells(a.get(field), b.get(field), descending));
}

fn compare_cells(a: &str, b: &str, descending: bool) -> Ordering {
    let a_missing = a == NOT_AVAILABLE;
    let b_missing = b == NOT_AVAILABLE;

    // Missing values sort last regardless of direction
    match (a_missing, b_missing) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ordering = match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    };

    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Extract a leading numeric value, so "4.2/5" and "1.234" both compare
/// numerically.
fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return Some(n);
    }
    let prefix: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if prefix.is_empty() {
        None
    } else {
        prefix.parse().ok()
    }
}
