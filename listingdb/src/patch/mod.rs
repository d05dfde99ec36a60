use crate::record::{Address, PropertyType, Record};
use serde::{Deserialize, Serialize};

/// Partial update for a [`Record`]. Only caller-updatable fields are representable,
/// so `key` and the timestamps can never be overwritten through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordPatch {
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

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    pub fn bathrooms(mut self, bathrooms: u32) -> Self {
        self.bathrooms = Some(bathrooms);
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// True when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the named fields onto `record`. Unnamed fields are left untouched.
    pub fn apply_to(&self, record: &mut Record) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(location) = &self.location {
            record.location = location.clone();
        }
        if let Some(bedrooms) = self.bedrooms {
            record.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            record.bathrooms = bathrooms;
        }
        if let Some(area) = self.area {
            record.area = area;
        }
        if let Some(property_type) = &self.property_type {
            record.property_type = property_type.clone().normalized();
        }
        if self.address.is_some() {
            record.address = self.address.clone();
        }
        if self.rooms.is_some() {
            record.rooms = self.rooms;
        }
        if self.floor.is_some() {
            record.floor = self.floor;
        }
        if self.number_of_floors.is_some() {
            record.number_of_floors = self.number_of_floors;
        }
        if self.build_year.is_some() {
            record.build_year = self.build_year;
        }
        if self.sale_date.is_some() {
            record.sale_date = self.sale_date.clone();
        }
    }
}
