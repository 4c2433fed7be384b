//! Response normalization.
//!
//! The model is asked for a strict JSON array, but its output is treated as
//! hostile input: it may be wrapped in markdown fences or prose, keyed with
//! inconsistent field names, or fall back to the legacy CSV table with the
//! Turkish header row. This module routes the cleaned text to the right
//! parser and guarantees that every surviving record has all twelve fields
//! populated (with the `N/A` sentinel where the model gave nothing usable).

pub mod csv;
pub mod json;

use crate::record::Business;
use localfind_core::{AppError, AppResult};

/// Normalize a raw model reply into business records.
///
/// Routing:
/// 1. Strip markdown code fences.
/// 2. If a `[...]` slice parses as a JSON array, take the JSON path.
/// 3. Otherwise, if the first line carries the known CSV header, take the
///    CSV path.
/// 4. Otherwise the reply is malformed (the dispatch layer may retry).
pub fn normalize_response(text: &str) -> AppResult<Vec<Business>> {
    let cleaned = strip_code_fences(text);

    if let Some(slice) = json::extract_json_array(&cleaned) {
        match json::parse_json_records(slice) {
            Ok(records) => return Ok(records),
            Err(e) if csv::looks_like_csv(&cleaned) => {
                // A '[' inside CSV cell text can fake a JSON array;
                // fall through to the CSV parser.
                tracing::debug!("JSON path failed ({}), trying CSV", e);
            }
            Err(e) => return Err(e),
        }
    }

    if csv::looks_like_csv(&cleaned) {
        return csv::parse_csv_records(&cleaned);
    }

    Err(AppError::Malformed(
        "Reply contains neither a JSON array nor the expected CSV header".to_string(),
    ))
}

/// Remove markdown code fences (```json ... ```), keeping their content.
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, NOT_AVAILABLE};

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n[{\"name\": \"A\"}]\n```";
        assert_eq!(strip_code_fences(fenced), "[{\"name\": \"A\"}]");

        let plain = "[{\"name\": \"A\"}]";
        assert_eq!(strip_code_fences(plain), plain);
    }

    #[test]
    fn test_routes_fenced_json() {
        let reply = "Here are the results:\n```json\n[{\"name\": \"Kafe Pi\", \"phone\": \"+90 212 555 0101\"}]\n```\nLet me know if you need more.";
        let records = normalize_response(reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Kafe Pi");
        assert_eq!(records[0].phone, "+90 212 555 0101");
        assert_eq!(records[0].get(Field::Email), NOT_AVAILABLE);
    }

    #[test]
    fn test_routes_csv() {
        let reply = "İşletme Adı,Kategori,Adres,Telefon Numarası,Web Sitesi,E-posta,Google Maps Linki,Değerlendirme Puanı,Değerlendirme Sayısı,Fiyat Aralığı,Çalışma Saatleri,Durum\nKafe Pi,Cafe,Moda Cad. 1,N/A,N/A,N/A,N/A,4.2/5,120,$$,09:00-22:00,Open";
        let records = normalize_response(reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Kafe Pi");
        assert_eq!(records[0].rating, "4.2/5");
    }

    #[test]
    fn test_unusable_reply_is_malformed() {
        let err = normalize_response("Sorry, I could not find anything.").unwrap_err();
        assert!(err.is_malformed());
    }
}
