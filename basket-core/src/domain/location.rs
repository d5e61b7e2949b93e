//! Delivery regions used by address forms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct City {
    #[validate(length(min = 1, message = "City name is required"))]
    pub name: String,
    #[serde(default)]
    pub zones: Vec<String>,
}

/// A province and the cities/zones we deliver to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub province: String,
    #[sqlx(json)]
    pub cities: Vec<City>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpsertLocationInput {
    #[validate(length(min = 1, max = 128, message = "Province is required"))]
    pub province: String,
    #[validate(nested)]
    #[serde(default)]
    pub cities: Vec<City>,
}

impl UpsertLocationInput {
    /// Trim the province and every city and zone name
    pub fn normalized(mut self) -> Self {
        self.province = self.province.trim().to_string();
        for city in &mut self.cities {
            city.name = city.name.trim().to_string();
            for zone in &mut city.zones {
                *zone = zone.trim().to_string();
            }
        }
        self
    }
}
