use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Rent,
    Sale,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Rent => "rent",
            Operation::Sale => "sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rent" => Some(Operation::Rent),
            "sale" => Some(Operation::Sale),
            _ => None,
        }
    }
}

/// Kind of unit being listed, as the backend names it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Room,
    Studio,
    Office,
    Commercial,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Room => "room",
            PropertyType::Studio => "studio",
            PropertyType::Office => "office",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "apartment" => Some(PropertyType::Apartment),
            "house" => Some(PropertyType::House),
            "room" => Some(PropertyType::Room),
            "studio" => Some(PropertyType::Studio),
            "office" => Some(PropertyType::Office),
            "commercial" => Some(PropertyType::Commercial),
            "land" => Some(PropertyType::Land),
            _ => None,
        }
    }
}

/// A point on the map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Read-only projection of a listing as returned by the search backend.
///
/// Decoding is forgiving: `null`, decimals sent as strings, and enum values
/// this crate does not know fall back to defaults instead of failing the
/// whole listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyResult {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default = "default_currency", deserialize_with = "currency_or_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient")]
    pub operation: Option<Operation>,
    #[serde(default, deserialize_with = "lenient")]
    pub property_type: Option<PropertyType>,
    #[serde(default, alias = "lat", deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon", deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_virtual_tour: bool,
    #[serde(default, alias = "verified", deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorites_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PropertyResult {
    /// Map position, present only when the backend sent both coordinates
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }

    pub fn has_media(&self) -> bool {
        !self.images.is_empty() || self.has_video || self.has_virtual_tour
    }

    /// Identifier used in detail URLs: the slug when there is one
    pub fn route_key(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.id)
    }
}

fn default_currency() -> String {
    "PEN".to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

// Some backends serialize decimals as strings ("-12.1211")
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse().ok()),
        _ => Ok(None),
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or_default())
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32))
}

/// `null` decodes to the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn currency_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(default_currency))
}

/// Optional field that decodes to `None` when the value has an unexpected shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_listing() {
        let property: PropertyResult = serde_json::from_value(json!({ "id": 42 })).unwrap();

        assert_eq!(property.id, "42");
        assert_eq!(property.currency, "PEN");
        assert!(property.coordinates().is_none());
        assert!(!property.has_media());
    }

    #[test]
    fn test_nulls_and_string_numbers_keep_the_listing() {
        let property: PropertyResult = serde_json::from_value(json!({
            "id": "a",
            "title": null,
            "price": "1500.00",
            "currency": null,
            "images": null,
            "bedrooms": null,
            "bathrooms": "2",
            "area": "85.5",
            "views_count": null,
            "favorites_count": null,
            "has_video": null,
            "operation": "lease",
            "property_type": "castle",
            "published_at": "yesterday"
        }))
        .unwrap();

        assert_eq!(property.title, "");
        assert_eq!(property.price, 1500.0);
        assert_eq!(property.currency, "PEN");
        assert!(property.images.is_empty());
        assert_eq!(property.bedrooms, None);
        assert_eq!(property.bathrooms, Some(2));
        assert_eq!(property.area, Some(85.5));
        assert_eq!(property.views_count, 0);
        assert_eq!(property.operation, None);
        assert_eq!(property.property_type, None);
        assert_eq!(property.published_at, None);

        let property: PropertyResult =
            serde_json::from_value(json!({ "id": "b", "price": null })).unwrap();
        assert_eq!(property.price, 0.0);
    }

    #[test]
    fn test_deserialize_string_coordinates() {
        let property: PropertyResult = serde_json::from_value(json!({
            "id": "abc",
            "slug": "depa-miraflores",
            "lat": "-12.1211",
            "lng": -77.0297,
            "rating": "4.5",
            "verified": true
        }))
        .unwrap();

        let coords = property.coordinates().unwrap();
        assert_eq!(coords.latitude, -12.1211);
        assert_eq!(coords.longitude, -77.0297);
        assert_eq!(property.rating, Some(4.5));
        assert!(property.is_verified);
        assert_eq!(property.route_key(), "depa-miraflores");
    }

    #[test]
    fn test_half_coordinates_are_not_a_position() {
        let property: PropertyResult =
            serde_json::from_value(json!({ "id": "1", "latitude": -12.0 })).unwrap();

        assert!(property.coordinates().is_none());
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(PropertyType::parse("apartment"), Some(PropertyType::Apartment));
        assert_eq!(PropertyType::House.as_str(), "house");
        assert_eq!(Operation::parse("sale"), Some(Operation::Sale));
        assert_eq!(Operation::parse("lease"), None);
    }
}
