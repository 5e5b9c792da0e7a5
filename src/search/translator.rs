use crate::search::rules;
use crate::search::types::{
    PageRequest, PropertyQueryParameters, SearchFilters, SortOrder, DEFAULT_SORT_BY,
};

/// `rental_model` value used for listings eligible for short stays
pub const AIRBNB_RENTAL_MODEL: &str = "airbnb";

/// Translate filter selections into the search endpoint's parameters.
///
/// Pure: the same filters and page always give the same parameters.
/// Structured filters take precedence over anything read from the free text;
/// text-derived amenities are appended after the explicit ones.
pub fn translate(filters: &SearchFilters, page: PageRequest) -> PropertyQueryParameters {
    let interpretation = filters
        .location_text()
        .map(rules::interpret)
        .unwrap_or_default();

    let mut amenities = filters.amenities.clone();
    for amenity in interpretation.amenities {
        if !amenities.contains(&amenity) {
            amenities.push(amenity);
        }
    }

    PropertyQueryParameters {
        q: interpretation.q,
        location: interpretation.location,
        operation: filters.operation,
        property_type: filters.property_type.or(interpretation.property_type),
        min_price: filters.min_price,
        max_price: filters.max_price,
        min_bedrooms: filters.bedrooms,
        min_bathrooms: filters.bathrooms,
        min_area: filters.min_area,
        max_area: filters.max_area,
        furnished: filters.furnished,
        pet_friendly: filters.pet_friendly,
        verified: filters.verified,
        rental_mode: filters.rental_mode.map(|mode| mode.query_value()),
        rental_model: match filters.airbnb_eligible {
            Some(true) => Some(AIRBNB_RENTAL_MODEL),
            _ => None,
        },
        agency_id: filters.agency_id.clone(),
        amenities,
        page: page.page,
        limit: page.limit,
        sort_by: DEFAULT_SORT_BY.to_string(),
        sort_order: SortOrder::Desc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Operation, PropertyType};
    use crate::search::types::RentalMode;

    fn with_location(text: &str) -> SearchFilters {
        SearchFilters {
            location: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_always_present() {
        let params = translate(&SearchFilters::default(), PageRequest::default());

        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 20);
        assert_eq!(params.sort_by, "published_at");
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert_eq!(params.q, None);
        assert_eq!(params.location, None);
        assert!(params.amenities.is_empty());
    }

    #[test]
    fn test_no_location_means_no_text_fields() {
        let filters = SearchFilters {
            operation: Some(Operation::Rent),
            amenities: vec!["Terraza".to_string()],
            min_price: Some(1500.0),
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::new(2, 50));

        assert_eq!(params.q, None);
        assert_eq!(params.location, None);
        assert_eq!(params.amenities, vec!["Terraza"]);
        assert_eq!(params.min_price, Some(1500.0));
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 50);
    }

    #[test]
    fn test_departamento_en_miraflores() {
        let params = translate(
            &with_location("departamento en miraflores"),
            PageRequest::default(),
        );

        assert_eq!(params.property_type, Some(PropertyType::Apartment));
        assert_eq!(params.location.as_deref(), Some("miraflores"));
        assert_eq!(params.q, None);
    }

    #[test]
    fn test_casa_con_piscina() {
        let params = translate(&with_location("casa con piscina"), PageRequest::default());

        assert_eq!(params.amenities, vec!["Piscina"]);
        assert_eq!(params.location, None);
        assert_eq!(params.property_type, None);
    }

    #[test]
    fn test_amenity_and_place() {
        let params = translate(
            &with_location("con gimnasio en surco"),
            PageRequest::default(),
        );

        assert_eq!(params.amenities, vec!["Gimnasio"]);
        assert_eq!(params.location.as_deref(), Some("surco"));
    }

    #[test]
    fn test_type_and_place_without_en() {
        let params = translate(&with_location("casa lince"), PageRequest::default());

        assert_eq!(params.property_type, Some(PropertyType::House));
        assert_eq!(params.location.as_deref(), Some("lince"));
    }

    #[test]
    fn test_explicit_type_wins_over_text() {
        let filters = SearchFilters {
            location: Some("casa en surco".to_string()),
            property_type: Some(PropertyType::Land),
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::default());

        assert_eq!(params.property_type, Some(PropertyType::Land));
        assert_eq!(params.location.as_deref(), Some("surco"));
    }

    #[test]
    fn test_text_amenities_appended_without_duplicates() {
        let filters = SearchFilters {
            location: Some("terraza y piscina".to_string()),
            amenities: vec!["Piscina".to_string()],
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::default());

        assert_eq!(params.amenities, vec!["Piscina", "Terraza"]);
    }

    #[test]
    fn test_booleans_only_when_set() {
        let filters = SearchFilters {
            furnished: Some(false),
            verified: Some(true),
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::default());

        assert_eq!(params.furnished, Some(false));
        assert_eq!(params.verified, Some(true));
        assert_eq!(params.pet_friendly, None);

        let names: Vec<&str> = params.to_query_pairs().iter().map(|(k, _)| *k).collect();
        assert!(names.contains(&"furnished"));
        assert!(!names.contains(&"pet_friendly"));
    }

    #[test]
    fn test_rental_mode_and_airbnb() {
        let filters = SearchFilters {
            rental_mode: Some(RentalMode::Coliving),
            airbnb_eligible: Some(true),
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::default());
        assert_eq!(params.rental_mode, Some("private_room"));
        assert_eq!(params.rental_model, Some("airbnb"));

        let filters = SearchFilters {
            airbnb_eligible: Some(false),
            ..Default::default()
        };
        let params = translate(&filters, PageRequest::default());
        assert_eq!(params.rental_model, None);
    }

    #[test]
    fn test_feature_text_goes_to_q() {
        let params = translate(&with_location("Amoblado cerca al parque"), PageRequest::default());

        assert_eq!(params.q.as_deref(), Some("Amoblado cerca al parque"));
        assert_eq!(params.location, None);
    }

    #[test]
    fn test_idempotent() {
        let filters = SearchFilters {
            location: Some("departamento con piscina en miraflores".to_string()),
            max_price: Some(3000.0),
            bedrooms: Some(2),
            pet_friendly: Some(true),
            ..Default::default()
        };

        let first = translate(&filters, PageRequest::default());
        let second = translate(&filters, PageRequest::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_pairs_repeat_amenities() {
        let filters = SearchFilters {
            amenities: vec!["Piscina".to_string(), "Gimnasio".to_string()],
            min_price: Some(1500.0),
            ..Default::default()
        };
        let pairs = translate(&filters, PageRequest::default()).to_query_pairs();

        let amenities: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "amenities")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(amenities, vec!["Piscina", "Gimnasio"]);
        assert!(pairs.contains(&("min_price", "1500".to_string())));
        assert!(pairs.contains(&("sort_order", "desc".to_string())));
    }
}
