use crate::models::{Operation, PropertyType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SORT_BY: &str = "published_at";
pub const DEFAULT_LIMIT: u32 = 20;

/// How a rental unit is shared, as the user picks it in the filter panel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RentalMode {
    Traditional,
    Shared,
    Coliving,
    Private,
}

impl RentalMode {
    /// Value the search backend expects for `rental_mode`
    pub fn query_value(&self) -> &'static str {
        match self {
            RentalMode::Traditional => "full_property",
            RentalMode::Shared => "shared_room",
            RentalMode::Coliving | RentalMode::Private => "private_room",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RentalMode::Traditional => "traditional",
            RentalMode::Shared => "shared",
            RentalMode::Coliving => "coliving",
            RentalMode::Private => "private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "traditional" => Some(RentalMode::Traditional),
            "shared" => Some(RentalMode::Shared),
            "coliving" => Some(RentalMode::Coliving),
            "private" => Some(RentalMode::Private),
            _ => None,
        }
    }
}

/// Filter selections held by the search page.
///
/// Every field is optional; `None` (or an empty amenity list) means no
/// constraint. Booleans distinguish "not set" from `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    /// Free text typed in the search box
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub operation: Option<Operation>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum number of bedrooms
    pub bedrooms: Option<u32>,
    /// Minimum number of bathrooms
    pub bathrooms: Option<u32>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub furnished: Option<bool>,
    pub pet_friendly: Option<bool>,
    pub verified: Option<bool>,
    pub rental_mode: Option<RentalMode>,
    pub airbnb_eligible: Option<bool>,
    pub agency_id: Option<String>,
    pub amenities: Vec<String>,
}

impl SearchFilters {
    /// Free text with surrounding whitespace removed, if any is left
    pub fn location_text(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Page/limit pair supplied by the caller of the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }
}

/// Normalized request sent to the search endpoint.
///
/// Built by [`crate::search::translate`]; fields are only read afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PropertyQueryParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furnished: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_model: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl PropertyQueryParameters {
    /// Flatten into `(name, value)` pairs for the HTTP query string.
    ///
    /// Amenities are repeated once per value under the same name.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();

        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((name, value));
            }
        };

        push("q", self.q.clone());
        push("location", self.location.clone());
        push("operation", self.operation.map(|o| o.as_str().to_string()));
        push(
            "property_type",
            self.property_type.map(|t| t.as_str().to_string()),
        );
        push("min_price", self.min_price.map(|v| v.to_string()));
        push("max_price", self.max_price.map(|v| v.to_string()));
        push("min_bedrooms", self.min_bedrooms.map(|v| v.to_string()));
        push("min_bathrooms", self.min_bathrooms.map(|v| v.to_string()));
        push("min_area", self.min_area.map(|v| v.to_string()));
        push("max_area", self.max_area.map(|v| v.to_string()));
        push("furnished", self.furnished.map(|v| v.to_string()));
        push("pet_friendly", self.pet_friendly.map(|v| v.to_string()));
        push("verified", self.verified.map(|v| v.to_string()));
        push("rental_mode", self.rental_mode.map(str::to_string));
        push("rental_model", self.rental_model.map(str::to_string));
        push("agency_id", self.agency_id.clone());

        for amenity in &self.amenities {
            pairs.push(("amenities", amenity.clone()));
        }

        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("sort_by", self.sort_by.clone()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_mode_translation() {
        assert_eq!(RentalMode::Traditional.query_value(), "full_property");
        assert_eq!(RentalMode::Shared.query_value(), "shared_room");
        assert_eq!(RentalMode::Coliving.query_value(), "private_room");
        assert_eq!(RentalMode::Private.query_value(), "private_room");
    }

    #[test]
    fn test_location_text_ignores_blank() {
        let filters = SearchFilters {
            location: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.location_text(), None);

        let filters = SearchFilters {
            location: Some("  Barranco ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.location_text(), Some("Barranco"));
    }

    #[test]
    fn test_page_request_clamps_to_one() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::default(), PageRequest { page: 1, limit: 20 });
    }
}
