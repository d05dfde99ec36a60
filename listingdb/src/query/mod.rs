// Exact-match search criteria

use crate::record::{Address, PropertyType, Record, RecordKey, TextLabel};
use serde::{Deserialize, Serialize};

/// A search predicate. Every field that is `Some` must equal the record's value;
/// `None` leaves the field unconstrained. The default criteria match every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressCriteria>,
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

/// Sub-field criteria for [`Address`]. Text labels are compared by their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddressCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<TextLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<TextLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<TextLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<u32>,
}

/// `None` in the criterion is a wildcard.
fn field_matches<T: PartialEq>(criterion: &Option<T>, value: &T) -> bool {
    criterion.as_ref().map_or(true, |c| c == value)
}

/// A record lacking an optional field never matches a criterion that names it.
fn optional_matches<T: PartialEq>(criterion: &Option<T>, value: &Option<T>) -> bool {
    match criterion {
        None => true,
        Some(c) => value.as_ref() == Some(c),
    }
}

/// Types compare by label, so `Other("apartment")` matches `Apartment`.
fn type_matches(criterion: &Option<PropertyType>, value: &PropertyType) -> bool {
    criterion.as_ref().map_or(true, |c| c.as_str() == value.as_str())
}

fn label_matches(criterion: &Option<TextLabel>, value: &TextLabel) -> bool {
    criterion.as_ref().map_or(true, |c| c.text == value.text)
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<RecordKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = Some(bedrooms);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn address(mut self, address: AddressCriteria) -> Self {
        self.address = Some(address);
        self
    }

    /// True when no field is constrained.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        field_matches(&self.key, &record.key)
            && field_matches(&self.title, &record.title)
            && field_matches(&self.description, &record.description)
            && field_matches(&self.price, &record.price)
            && field_matches(&self.location, &record.location)
            && field_matches(&self.bedrooms, &record.bedrooms)
            && field_matches(&self.bathrooms, &record.bathrooms)
            && field_matches(&self.area, &record.area)
            && type_matches(&self.property_type, &record.property_type)
            && self.address_matches(record.address.as_ref())
            && optional_matches(&self.rooms, &record.rooms)
            && optional_matches(&self.floor, &record.floor)
            && optional_matches(&self.number_of_floors, &record.number_of_floors)
            && optional_matches(&self.build_year, &record.build_year)
            && optional_matches(&self.sale_date, &record.sale_date)
    }

    fn address_matches(&self, address: Option<&Address>) -> bool {
        match (&self.address, address) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(criteria), Some(address)) => criteria.matches(address),
        }
    }
}

impl AddressCriteria {
    pub fn city(mut self, city: &str) -> Self {
        self.city = Some(TextLabel::from(city));
        self
    }

    pub fn neighborhood(mut self, neighborhood: &str) -> Self {
        self.neighborhood = Some(TextLabel::from(neighborhood));
        self
    }

    pub fn street(mut self, street: &str) -> Self {
        self.street = Some(TextLabel::from(street));
        self
    }

    pub fn house_number(mut self, house_number: u32) -> Self {
        self.house_number = Some(house_number);
        self
    }

    pub fn matches(&self, address: &Address) -> bool {
        label_matches(&self.city, &address.city)
            && label_matches(&self.neighborhood, &address.neighborhood)
            && label_matches(&self.street, &address.street)
            && field_matches(&self.house_number, &address.house_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use chrono::Utc;

    fn record(key: &str, property_type: PropertyType, price: u64) -> Record {
        let mut new = NewRecord::new(format!("Listing {key}"), property_type);
        new.price = price;
        Record::from_new(RecordKey::from(key), Utc::now(), new)
    }

    fn with_address(mut record: Record, city: &str, number: u32) -> Record {
        record.address = Some(Address {
            city: TextLabel::from(city),
            neighborhood: TextLabel::from("Center"),
            street: TextLabel::from("Main"),
            house_number: number,
        });
        record
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = SearchCriteria::default();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&record("a", PropertyType::Land, 1)));
        assert!(criteria.matches(&with_address(record("b", PropertyType::House, 2), "Haifa", 3)));
    }

    #[test]
    fn test_every_named_field_must_match() {
        let r = record("a", PropertyType::Apartment, 100);
        assert!(SearchCriteria::new().property_type(PropertyType::Apartment).matches(&r));
        assert!(SearchCriteria::new()
            .property_type(PropertyType::Apartment)
            .price(100)
            .matches(&r));
        assert!(!SearchCriteria::new()
            .property_type(PropertyType::Apartment)
            .price(101)
            .matches(&r));
        assert!(!SearchCriteria::new().property_type(PropertyType::House).matches(&r));
    }

    #[test]
    fn test_type_criterion_compares_labels() {
        let r = record("a", PropertyType::Apartment, 100);
        let criteria = SearchCriteria::new().property_type(PropertyType::Other("apartment".into()));
        assert!(criteria.matches(&r));
    }

    #[test]
    fn test_no_substring_matching() {
        let r = record("a", PropertyType::Apartment, 100);
        assert!(!SearchCriteria::new().title("Listing").matches(&r));
        assert!(SearchCriteria::new().title("Listing a").matches(&r));
    }

    #[test]
    fn test_address_criteria_compare_label_text() {
        let r = with_address(record("a", PropertyType::House, 1), "Haifa", 7);

        let by_city = SearchCriteria::new().address(AddressCriteria::default().city("Haifa"));
        assert!(by_city.matches(&r));

        let by_city_and_number = SearchCriteria::new()
            .address(AddressCriteria::default().city("Haifa").house_number(8));
        assert!(!by_city_and_number.matches(&r));

        // A record without an address cannot satisfy an address criterion
        let bare = record("b", PropertyType::House, 1);
        assert!(!by_city.matches(&bare));
    }

    #[test]
    fn test_optional_field_absent_never_matches() {
        let mut r = record("a", PropertyType::Apartment, 1);
        let criteria = SearchCriteria {
            rooms: Some(3),
            ..Default::default()
        };
        assert!(!criteria.matches(&r));
        r.rooms = Some(3);
        assert!(criteria.matches(&r));
    }

    #[test]
    fn test_deserialize_from_json() {
        let criteria: SearchCriteria = serde_json::from_str(
            r#"{"type": "apartment", "address": {"city": {"text": "Haifa"}}}"#,
        )
        .unwrap();
        assert_eq!(criteria.property_type, Some(PropertyType::Apartment));
        assert_eq!(
            criteria.address.unwrap().city,
            Some(TextLabel::from("Haifa"))
        );

        let unknown: std::result::Result<SearchCriteria, _> =
            serde_json::from_str(r#"{"colour": "red"}"#);
        assert!(unknown.is_err());
    }
}
