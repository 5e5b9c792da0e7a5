//! Shareable URL query string for the current filters.
//!
//! Each set filter is written under its camelCase field name; unset filters
//! are left out and amenities repeat. Parsing skips what it cannot read.

use crate::models::{Operation, PropertyType};
use crate::search::types::{RentalMode, SearchFilters};
use tracing::debug;
use url::form_urlencoded;

/// Serialize filters into a query string (without the leading `?`)
pub fn to_query_string(filters: &SearchFilters) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(location) = filters.location_text() {
        serializer.append_pair("location", location);
    }
    if let Some(property_type) = filters.property_type {
        serializer.append_pair("propertyType", property_type.as_str());
    }
    if let Some(operation) = filters.operation {
        serializer.append_pair("operation", operation.as_str());
    }

    let numbers = [
        ("minPrice", filters.min_price),
        ("maxPrice", filters.max_price),
        ("bedrooms", filters.bedrooms.map(f64::from)),
        ("bathrooms", filters.bathrooms.map(f64::from)),
        ("minArea", filters.min_area),
        ("maxArea", filters.max_area),
    ];
    for (name, value) in numbers {
        if let Some(value) = value {
            serializer.append_pair(name, &value.to_string());
        }
    }

    let flags = [
        ("furnished", filters.furnished),
        ("petFriendly", filters.pet_friendly),
        ("verified", filters.verified),
        ("airbnbEligible", filters.airbnb_eligible),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            serializer.append_pair(name, if value { "true" } else { "false" });
        }
    }

    if let Some(mode) = filters.rental_mode {
        serializer.append_pair("rentalMode", mode.as_str());
    }
    if let Some(agency_id) = &filters.agency_id {
        serializer.append_pair("agencyId", agency_id);
    }
    for amenity in &filters.amenities {
        serializer.append_pair("amenities", amenity);
    }

    serializer.finish()
}

/// Rebuild filters from a query string; a leading `?` is accepted
pub fn from_query_string(query: &str) -> SearchFilters {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut filters = SearchFilters::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let parsed = match &*key {
            "location" => {
                filters.location = Some(value.to_string());
                true
            }
            "propertyType" => set(&mut filters.property_type, PropertyType::parse(value)),
            "operation" => set(&mut filters.operation, Operation::parse(value)),
            "minPrice" => set(&mut filters.min_price, value.parse().ok()),
            "maxPrice" => set(&mut filters.max_price, value.parse().ok()),
            "bedrooms" => set(&mut filters.bedrooms, value.parse().ok()),
            "bathrooms" => set(&mut filters.bathrooms, value.parse().ok()),
            "minArea" => set(&mut filters.min_area, value.parse().ok()),
            "maxArea" => set(&mut filters.max_area, value.parse().ok()),
            "furnished" => set(&mut filters.furnished, parse_flag(value)),
            "petFriendly" => set(&mut filters.pet_friendly, parse_flag(value)),
            "verified" => set(&mut filters.verified, parse_flag(value)),
            "airbnbEligible" => set(&mut filters.airbnb_eligible, parse_flag(value)),
            "rentalMode" => set(&mut filters.rental_mode, RentalMode::parse(value)),
            "agencyId" => {
                filters.agency_id = Some(value.to_string());
                true
            }
            "amenities" => {
                if !filters.amenities.iter().any(|a| a == value) {
                    filters.amenities.push(value.to_string());
                }
                true
            }
            _ => false,
        };

        if !parsed {
            debug!("Ignoring query parameter {}={}", key, value);
        }
    }

    filters
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
