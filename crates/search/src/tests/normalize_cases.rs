//! End-to-end normalization cases over realistic model replies.

use crate::normalize::normalize_response;
use crate::record::{Field, NOT_AVAILABLE};

#[test]
fn test_clean_json_reply() {
    let reply = r#"[
        {
            "name": "Çınaraltı Çay Bahçesi",
            "category": "Tea Garden",
            "address": "Çengelköy Mah. Çınarlı Cad. No:4, Üsküdar, İstanbul",
            "phone": "+90 216 555 0142",
            "website": "N/A",
            "email": "N/A",
            "mapsLink": "https://maps.google.com/?cid=7731",
            "rating": "4.6/5",
            "reviews": "8521",
            "price": "$",
            "hours": "07:00 - 23:30",
            "status": "Open"
        }
    ]"#;

    let records = normalize_response(reply).unwrap();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.name, "Çınaraltı Çay Bahçesi");
    assert_eq!(r.maps_link, "https://maps.google.com/?cid=7731");
    assert_eq!(r.review_count, "8521");
    assert_eq!(r.website, NOT_AVAILABLE);
    for field in Field::ALL {
        assert!(!r.get(field).is_empty());
    }
}

#[test]
fn test_fenced_json_with_prose() {
    let reply = "Sure! I searched Google Maps for bakeries near you.\n\n```json\n[{\"name\": \"Fırın Ekspres\", \"category\": \"Bakery\"}, {\"name\": \"Tatlıcı Meşhur\", \"category\": \"Patisserie\"}]\n```\n\nBoth are highly rated.";
    let records = normalize_response(reply).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Fırın Ekspres");
    assert_eq!(records[1].category, "Patisserie");
}

#[test]
fn test_mixed_key_spellings() {
    let reply = r#"[
        {"Business Name": "A", "Telefon Numarası": "+90 212 555 0100", "maps_link": "https://maps.google.com/?cid=1"},
        {"name": "B", "phoneNumber": "+90 212 555 0101", "Google Maps Linki": "https://maps.google.com/?cid=2"}
    ]"#;

    let records = normalize_response(reply).unwrap();
    assert_eq!(records[0].phone, "+90 212 555 0100");
    assert_eq!(records[0].maps_link, "https://maps.google.com/?cid=1");
    assert_eq!(records[1].phone, "+90 212 555 0101");
    assert_eq!(records[1].maps_link, "https://maps.google.com/?cid=2");
}

#[test]
fn test_fenced_csv_reply() {
    let reply = "```\nİşletme Adı,Kategori,Adres,Telefon Numarası,Web Sitesi,E-posta,Google Maps Linki,Değerlendirme Puanı,Değerlendirme Sayısı,Fiyat Aralığı,Çalışma Saatleri,Durum\nBalıkçı Niyazi,Seafood,\"Kumkapı, Fatih\",+90 212 555 0177,N/A,N/A,https://maps.google.com/?cid=9,4.4/5,2310,$$$,12:00-24:00,Open\n```";
    let records = normalize_response(reply).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "Kumkapı, Fatih");
    assert_eq!(records[0].price_range, "$$$");
}

#[test]
fn test_csv_with_unquoted_address_commas() {
    let reply = "İşletme Adı,Kategori,Adres,Telefon Numarası,Web Sitesi,E-posta,Google Maps Linki,Değerlendirme Puanı,Değerlendirme Sayısı,Fiyat Aralığı,Çalışma Saatleri,Durum\nKasap Dursun,Butcher,Atatürk Cad. No:12, Bornova, İzmir,N/A,N/A,N/A,N/A,4.1/5,89,$$,08:30-19:00,Open";
    let records = normalize_response(reply).unwrap();
    assert_eq!(records[0].address, "Atatürk Cad. No:12, Bornova, İzmir");
    assert_eq!(records[0].status, "Open");
}

#[test]
fn test_empty_json_array() {
    let records = normalize_response("[]").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_csv_header_only() {
    let reply = "İşletme Adı,Kategori,Adres,Telefon Numarası,Web Sitesi,E-posta,Google Maps Linki,Değerlendirme Puanı,Değerlendirme Sayısı,Fiyat Aralığı,Çalışma Saatleri,Durum";
    let records = normalize_response(reply).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_prose_only_reply_is_malformed() {
    let err = normalize_response("I could not find any businesses matching that.").unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_every_field_populated_after_sparse_json() {
    let records = normalize_response(r#"[{"name": "Only Name"}]"#).unwrap();
    let r = &records[0];
    assert_eq!(r.name, "Only Name");
    for field in Field::ALL.into_iter().filter(|f| *f != Field::Name) {
        assert_eq!(r.get(field), NOT_AVAILABLE);
    }
}
