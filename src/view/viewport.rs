use crate::models::{Coordinates, PropertyResult};
use serde::Serialize;

/// Zoom used when every result sits on (nearly) the same spot
pub const MAX_FIT_ZOOM: u8 = 14;

/// `(minimum spread in degrees, zoom)`, widest first
const ZOOM_THRESHOLDS: &[(f64, u8)] = &[(0.5, 10), (0.2, 11), (0.1, 12), (0.05, 13)];

/// Map camera position fitted to a result set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Zoom level for a coordinate spread (the larger of the lat/lng spans)
pub fn zoom_for_spread(spread: f64) -> u8 {
    ZOOM_THRESHOLDS
        .iter()
        .find(|(min_spread, _)| spread >= *min_spread)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(MAX_FIT_ZOOM)
}

/// Center on the mean position and zoom to the spread of the results.
///
/// Listings without coordinates are ignored; `None` when none have any.
pub fn fit(results: &[PropertyResult]) -> Option<Viewport> {
    let points: Vec<Coordinates> = results.iter().filter_map(|r| r.coordinates()).collect();
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let mean_lat = points.iter().map(|p| p.latitude).sum::<f64>() / count;
    let mean_lng = points.iter().map(|p| p.longitude).sum::<f64>() / count;

    let span = |values: &mut dyn Iterator<Item = f64>| {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
        max - min
    };
    let lat_spread = span(&mut points.iter().map(|p| p.latitude));
    let lng_spread = span(&mut points.iter().map(|p| p.longitude));

    Some(Viewport {
        center: Coordinates {
            latitude: mean_lat,
            longitude: mean_lng,
        },
        zoom: zoom_for_spread(lat_spread.max(lng_spread)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, lat: Option<f64>, lng: Option<f64>) -> PropertyResult {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "latitude": lat,
            "longitude": lng,
        }))
        .unwrap()
    }

    #[test]
    fn test_zoom_boundaries() {
        assert_eq!(zoom_for_spread(0.8), 10);
        assert_eq!(zoom_for_spread(0.5), 10);
        assert_eq!(zoom_for_spread(0.49), 11);
        assert_eq!(zoom_for_spread(0.2), 11);
        assert_eq!(zoom_for_spread(0.19), 12);
        assert_eq!(zoom_for_spread(0.1), 12);
        assert_eq!(zoom_for_spread(0.09), 13);
        assert_eq!(zoom_for_spread(0.05), 13);
        assert_eq!(zoom_for_spread(0.049), 14);
        assert_eq!(zoom_for_spread(0.0), 14);
    }

    #[test]
    fn test_fit_uses_mean_and_max_spread() {
        let results = vec![
            at("a", Some(-12.0), Some(-77.0)),
            at("b", Some(-12.5), Some(-77.1)),
        ];

        let viewport = fit(&results).unwrap();
        assert_eq!(viewport.center.latitude, -12.25);
        assert!((viewport.center.longitude - -77.05).abs() < 1e-9);
        // lat spread 0.5 wins over lng spread ~0.1
        assert_eq!(viewport.zoom, 10);
    }

    #[test]
    fn test_fit_skips_missing_coordinates() {
        let results = vec![
            at("a", Some(-12.1), Some(-77.03)),
            at("b", None, None),
            at("c", Some(40.0), None),
        ];

        let viewport = fit(&results).unwrap();
        assert_eq!(viewport.center.latitude, -12.1);
        assert_eq!(viewport.center.longitude, -77.03);
        assert_eq!(viewport.zoom, 14);
    }

    #[test]
    fn test_fit_without_coordinates() {
        assert_eq!(fit(&[at("a", None, None)]), None);
        assert_eq!(fit(&[]), None);
    }
}
