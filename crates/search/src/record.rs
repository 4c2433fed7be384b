//! The fixed tabular schema for normalized business records.
//!
//! Every record carries exactly twelve string fields. Anything the model
//! left out, nulled, or garbled is filled with the `N/A` sentinel so
//! downstream consumers (table rendering, CSV export) never see holes.

use serde::{Deserialize, Serialize};

/// Sentinel for missing, null, or unparseable field values.
pub const NOT_AVAILABLE: &str = "N/A";

/// A normalized local-business record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub email: String,
    pub maps_link: String,
    pub rating: String,
    pub review_count: String,
    pub price_range: String,
    pub hours: String,
    pub status: String,
}

impl Default for Business {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            name: na(),
            category: na(),
            address: na(),
            phone: na(),
            website: na(),
            email: na(),
            maps_link: na(),
            rating: na(),
            review_count: na(),
            price_range: na(),
            hours: na(),
            status: na(),
        }
    }
}

impl Business {
    /// Get a field value by column.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Category => &self.category,
            Field::Address => &self.address,
            Field::Phone => &self.phone,
            Field::Website => &self.website,
            Field::Email => &self.email,
            Field::MapsLink => &self.maps_link,
            Field::Rating => &self.rating,
            Field::ReviewCount => &self.review_count,
            Field::PriceRange => &self.price_range,
            Field::Hours => &self.hours,
            Field::Status => &self.status,
        }
    }

    /// Set a field value by column.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Category => &mut self.category,
            Field::Address => &mut self.address,
            Field::Phone => &mut self.phone,
            Field::Website => &mut self.website,
            Field::Email => &mut self.email,
            Field::MapsLink => &mut self.maps_link,
            Field::Rating => &mut self.rating,
            Field::ReviewCount => &mut self.review_count,
            Field::PriceRange => &mut self.price_range,
            Field::Hours => &mut self.hours,
            Field::Status => &mut self.status,
        };
        *slot = value;
    }
}

/// The twelve table columns, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Category,
    Address,
    Phone,
    Website,
    Email,
    MapsLink,
    Rating,
    ReviewCount,
    PriceRange,
    Hours,
    Status,
}

impl Field {
    /// All columns in display order.
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::Category,
        Field::Address,
        Field::Phone,
        Field::Website,
        Field::Email,
        Field::MapsLink,
        Field::Rating,
        Field::ReviewCount,
        Field::PriceRange,
        Field::Hours,
        Field::Status,
    ];

    /// English display label (also the export CSV header).
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Business Name",
            Field::Category => "Category",
            Field::Address => "Address",
            Field::Phone => "Phone",
            Field::Website => "Website",
            Field::Email => "Email",
            Field::MapsLink => "Google Maps Link",
            Field::Rating => "Rating",
            Field::ReviewCount => "Review Count",
            Field::PriceRange => "Price Range",
            Field::Hours => "Hours",
            Field::Status => "Status",
        }
    }

    /// The Turkish header this column carries in the model's legacy CSV
    /// output format.
    pub fn csv_header(&self) -> &'static str {
        match self {
            Field::Name => "İşletme Adı",
            Field::Category => "Kategori",
            Field::Address => "Adres",
            Field::Phone => "Telefon Numarası",
            Field::Website => "Web Sitesi",
            Field::Email => "E-posta",
            Field::MapsLink => "Google Maps Linki",
            Field::Rating => "Değerlendirme Puanı",
            Field::ReviewCount => "Değerlendirme Sayısı",
            Field::PriceRange => "Fiyat Aralığı",
            Field::Hours => "Çalışma Saatleri",
            Field::Status => "Durum",
        }
    }

    /// Known JSON key spellings for this column, pre-normalized with
    /// [`normalize_key`] (lowercase, separators stripped).
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "businessname", "title", "işletmeadı"],
            Field::Category => &["category", "type", "kategori"],
            Field::Address => &["address", "fulladdress", "streetaddress", "adres"],
            Field::Phone => &[
                "phone",
                "phonenumber",
                "telephone",
                "tel",
                "telefon",
                "telefonnumarası",
            ],
            Field::Website => &["website", "websiteurl", "url", "web", "websitesi"],
            Field::Email => &["email", "emailaddress", "mail", "eposta"],
            Field::MapsLink => &[
                "mapslink",
                "googlemapslink",
                "googlemapslinki",
                "mapsurl",
                "maps",
            ],
            Field::Rating => &["rating", "ratingscore", "stars", "puan", "değerlendirmepuanı"],
            Field::ReviewCount => &[
                "reviews",
                "reviewcount",
                "numberofreviews",
                "değerlendirmesayısı",
            ],
            Field::PriceRange => &["price", "pricerange", "pricelevel", "fiyat", "fiyataralığı"],
            Field::Hours => &[
                "hours",
                "openinghours",
                "workinghours",
                "çalışmasaatleri",
            ],
            Field::Status => &["status", "openstatus", "durum"],
        }
    }

    /// Match a loosely spelled JSON key against the synonym lists.
    pub fn from_json_key(key: &str) -> Option<Field> {
        let normalized = normalize_key(key);
        Field::ALL
            .into_iter()
            .find(|field| field.synonyms().contains(&normalized.as_str()))
    }

    /// Match a CSV header cell (Turkish or English) to a column.
    pub fn from_header(header: &str) -> Option<Field> {
        let normalized = normalize_key(header);
        Field::ALL.into_iter().find(|field| {
            normalize_key(field.csv_header()) == normalized
                || normalize_key(field.label()) == normalized
                || field.synonyms().contains(&normalized.as_str())
        })
    }

    /// Parse a user-facing column name (for `--sort-by`).
    pub fn parse(s: &str) -> Option<Field> {
        Field::from_header(s)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase a key and strip spaces, underscores, dashes, and any other
/// non-alphanumeric characters, so "Maps Link", "maps_link", and
/// "mapsLink" all compare equal.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Maps Link"), "mapslink");
        assert_eq!(normalize_key("maps_link"), "mapslink");
        assert_eq!(normalize_key("MAPS-LINK"), "mapslink");
        assert_eq!(normalize_key("Telefon Numarası"), "telefonnumarası");
    }

    #[test]
    fn test_from_json_key_synonyms() {
        assert_eq!(Field::from_json_key("mapsLink"), Some(Field::MapsLink));
        assert_eq!(Field::from_json_key("Phone Number"), Some(Field::Phone));
        assert_eq!(Field::from_json_key("REVIEWS"), Some(Field::ReviewCount));
        assert_eq!(Field::from_json_key("e-posta"), Some(Field::Email));
        assert_eq!(Field::from_json_key("unknown_key"), None);
    }

    #[test]
    fn test_from_header_turkish() {
        for field in Field::ALL {
            assert_eq!(Field::from_header(field.csv_header()), Some(field));
        }
    }

    #[test]
    fn test_from_header_english_labels() {
        assert_eq!(Field::from_header("Business Name"), Some(Field::Name));
        assert_eq!(Field::from_header("Review Count"), Some(Field::ReviewCount));
    }

    #[test]
    fn test_default_record_is_all_sentinel() {
        let record = Business::default();
        for field in Field::ALL {
            assert_eq!(record.get(field), NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut record = Business::default();
        record.set(Field::Name, "Simit Sarayı".to_string());
        record.set(Field::Rating, "4.5/5".to_string());
        assert_eq!(record.get(Field::Name), "Simit Sarayı");
        assert_eq!(record.get(Field::Rating), "4.5/5");
        assert_eq!(record.get(Field::Phone), NOT_AVAILABLE);
    }
}
