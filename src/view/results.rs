use crate::models::{Coordinates, PropertyResult};
use crate::view::viewport::{self, Viewport};
use std::cmp::Ordering;

/// A map marker; always points back into the same result array as the list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    pub property: &'a PropertyResult,
    pub position: Coordinates,
    pub highlighted: bool,
}

/// The one result array both the list and the map render from.
///
/// Also owns the hovered id shared by the two views and the viewport fitted
/// to the current results.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    results: Vec<PropertyResult>,
    hovered: Option<String>,
    viewport: Option<Viewport>,
}

impl ResultSet {
    pub fn new(results: Vec<PropertyResult>) -> Self {
        let mut set = Self::default();
        set.replace(results);
        set
    }

    /// Swap in a new fetch result wholesale and refit the map
    pub fn replace(&mut self, results: Vec<PropertyResult>) {
        self.viewport = viewport::fit(&results);
        self.results = results;

        let hovered_gone = self
            .hovered
            .as_deref()
            .is_some_and(|id| !self.contains(id));
        if hovered_gone {
            self.hovered = None;
        }
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in fetch order
    pub fn results(&self) -> &[PropertyResult] {
        &self.results
    }

    pub fn contains(&self, id: &str) -> bool {
        self.results.iter().any(|r| r.id == id)
    }

    /// Hover from either view. Unknown ids are ignored; returns whether the
    /// hovered id changed.
    pub fn hover(&mut self, id: &str) -> bool {
        if !self.contains(id) || self.hovered.as_deref() == Some(id) {
            return false;
        }
        self.hovered = Some(id.to_string());
        true
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// List order: highest rating first, unrated last, ties in fetch order
    pub fn list_items(&self) -> Vec<&PropertyResult> {
        let mut items: Vec<&PropertyResult> = self.results.iter().collect();
        items.sort_by(|a, b| match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        items
    }

    /// One marker per result that has coordinates
    pub fn markers(&self) -> Vec<Marker<'_>> {
        self.results
            .iter()
            .filter_map(|property| {
                property.coordinates().map(|position| Marker {
                    property,
                    position,
                    highlighted: self.is_hovered(&property.id),
                })
            })
            .collect()
    }
}
