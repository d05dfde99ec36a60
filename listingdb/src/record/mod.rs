// Record model - the persisted listing shape and its create payload

use crate::error::{ListingDbError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, immutable identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        RecordKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(key: &str) -> Self {
        RecordKey(key.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(key: String) -> Self {
        RecordKey(key)
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Listing category. Unrecognised labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Land,
    Penthouse,
    Commercial,
    #[serde(untagged)]
    Other(String),
}

impl PropertyType {
    /// Map a label to its variant; `Other` only ever holds unrecognised labels.
    pub fn from_label(label: &str) -> Self {
        match label {
            "apartment" => PropertyType::Apartment,
            "house" => PropertyType::House,
            "land" => PropertyType::Land,
            "penthouse" => PropertyType::Penthouse,
            "commercial" => PropertyType::Commercial,
            other => PropertyType::Other(other.to_string()),
        }
    }

    /// Turn an `Other` holding a known label into that label's variant.
    pub fn normalized(self) -> Self {
        match self {
            PropertyType::Other(label) => Self::from_label(&label),
            known => known,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Land => "land",
            PropertyType::Penthouse => "penthouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Other(label) => label,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PropertyType {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

/// A text label as it appears inside structured addresses (`{ "text": "..." }`).
/// A bare string is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TextLabelRepr")]
pub struct TextLabel {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextLabelRepr {
    Bare(String),
    Labelled { text: String },
}

impl From<TextLabelRepr> for TextLabel {
    fn from(repr: TextLabelRepr) -> Self {
        match repr {
            TextLabelRepr::Bare(text) | TextLabelRepr::Labelled { text } => TextLabel { text },
        }
    }
}

impl From<&str> for TextLabel {
    fn from(text: &str) -> Self {
        TextLabel {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: TextLabel,
    pub neighborhood: TextLabel,
    pub street: TextLabel,
    pub house_number: u32,
}

/// One persisted listing. `key` and `created_at` never change after creation;
/// `updated_at` is owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub key: RecordKey,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: f64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_floors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
}

/// Create payload: every caller-supplied field of a [`Record`], without the
/// identity and timestamp fields the store assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_floors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
}

impl NewRecord {
    /// A payload with the given title and type; every other field zeroed or absent.
    pub fn new(title: impl Into<String>, property_type: PropertyType) -> Self {
        NewRecord {
            title: title.into(),
            description: String::new(),
            price: 0,
            location: String::new(),
            bedrooms: 0,
            bathrooms: 0,
            area: 0.0,
            property_type,
            address: None,
            rooms: None,
            floor: None,
            number_of_floors: None,
            build_year: None,
            sale_date: None,
        }
    }
}

impl Record {
    pub(crate) fn from_new(key: RecordKey, now: DateTime<Utc>, new: NewRecord) -> Self {
        Record {
            key,
            created_at: now,
            updated_at: now,
            title: new.title,
            description: new.description,
            price: new.price,
            location: new.location,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            area: new.area,
            property_type: new.property_type.normalized(),
            address: new.address,
            rooms: new.rooms,
            floor: new.floor,
            number_of_floors: new.number_of_floors,
            build_year: new.build_year,
            sale_date: new.sale_date,
        }
    }

    /// Reject values the backing file cannot represent faithfully.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.area.is_finite() {
            return Err(ListingDbError::InvalidField {
                field: "area",
                reason: format!("must be a finite number, got {}", self.area),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_known_and_other() {
        let known: PropertyType = serde_json::from_str("\"apartment\"").unwrap();
        assert_eq!(known, PropertyType::Apartment);

        let other: PropertyType = serde_json::from_str("\"villa\"").unwrap();
        assert_eq!(other, PropertyType::Other("villa".into()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"villa\"");
        assert_eq!(other.to_string(), "villa");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut new = NewRecord::new("Flat", PropertyType::Apartment);
        new.build_year = Some(1998);
        let now = Utc::now();
        let record = Record::from_new(RecordKey::from("k1"), now, new);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["key"], "k1");
        assert_eq!(json["type"], "apartment");
        assert_eq!(json["buildYear"], 1998);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
        // Absent optional fields are omitted
        assert!(json.get("address").is_none());
        assert!(json.get("saleDate").is_none());
    }

    #[test]
    fn test_new_record_rejects_identity_fields() {
        let result: std::result::Result<NewRecord, _> = serde_json::from_str(
            r#"{"title": "x", "price": 1, "type": "land", "key": "abc"}"#,
        );
        assert!(result.is_err());

        let result: std::result::Result<NewRecord, _> = serde_json::from_str(
            r#"{"title": "x", "price": 1, "type": "land", "createdAt": "2024-01-01T00:00:00Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_known_labels_never_stay_other() {
        assert_eq!(
            PropertyType::Other("apartment".into()).normalized(),
            PropertyType::Apartment
        );
        assert_eq!(PropertyType::from("land"), PropertyType::Land);
        assert_eq!(
            PropertyType::from_label("villa"),
            PropertyType::Other("villa".into())
        );

        let record = Record::from_new(
            RecordKey::from("k"),
            Utc::now(),
            NewRecord::new("x", PropertyType::Other("house".into())),
        );
        assert_eq!(record.property_type, PropertyType::House);
    }

    #[test]
    fn test_non_finite_area_is_invalid() {
        let mut new = NewRecord::new("x", PropertyType::Land);
        for area in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            new.area = area;
            let record = Record::from_new(RecordKey::from("k"), Utc::now(), new.clone());
            assert!(matches!(
                record.validate(),
                Err(ListingDbError::InvalidField { field: "area", .. })
            ));
        }
        new.area = 80.5;
        let record = Record::from_new(RecordKey::from("k"), Utc::now(), new);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_text_label_accepts_bare_string() {
        let label: TextLabel = serde_json::from_str("\"Haifa\"").unwrap();
        assert_eq!(label, TextLabel::from("Haifa"));

        // Always written in the labelled form
        assert_eq!(
            serde_json::to_string(&label).unwrap(),
            r#"{"text":"Haifa"}"#
        );
    }

    #[test]
    fn test_address_uses_text_labels() {
        let yaml = "city:\n  text: Tel Aviv\nneighborhood:\n  text: Florentin\nstreet:\n  text: Herzl\nhouseNumber: 12\n";
        let address: Address = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(address.city, TextLabel::from("Tel Aviv"));
        assert_eq!(address.house_number, 12);
    }
}
