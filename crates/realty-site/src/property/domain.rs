use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{MultilingualValue, SeoFields};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Sale,
    Rent,
}

impl ListingType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sale" | "buy" => Some(Self::Sale),
            "rent" => Some(Self::Rent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl PropertyStatus {
    /// schema.org availability URL used in offer markup.
    pub const fn schema_availability(self) -> &'static str {
        match self {
            PropertyStatus::Available => "https://schema.org/InStock",
            PropertyStatus::Reserved => "https://schema.org/LimitedAvailability",
            PropertyStatus::Sold => "https://schema.org/SoldOut",
        }
    }
}

/// A listed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub title: MultilingualValue,
    pub description: MultilingualValue,
    pub location: MultilingualValue,
    pub price: u64,
    pub currency: String,
    pub listing: ListingType,
    pub property_type: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub area_sqm: u32,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub featured: bool,
    pub seo: SeoFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDraft {
    pub title: MultilingualValue,
    pub description: MultilingualValue,
    pub location: MultilingualValue,
    pub price: u64,
    pub currency: Option<String>,
    pub listing: ListingType,
    pub property_type: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub area_sqm: u32,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub featured: bool,
    pub seo: SeoFields,
}
