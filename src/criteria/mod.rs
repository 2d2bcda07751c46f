pub mod types;

pub use types::{ParamError, SearchQuery};

use crate::models::PropertyType;
use std::fmt;
use url::form_urlencoded;

/// Allowed search radii in miles, in slider order
pub const RADIUS_OPTIONS: [f64; 17] = [
    0.25, 0.5, 0.75, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 20.0, 30.0, 40.0, 50.0,
];

/// Index of the 1 mile option
pub const DEFAULT_RADIUS_INDEX: usize = 3;

pub const RESULTS_PATH: &str = "/search-results";

/// Where the criteria selector sends the user on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub path: String,
    pub query: String,
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.path, self.query)
    }
}

/// State behind the search sidebar: property type, location and radius
#[derive(Debug, Clone)]
pub struct CriteriaSelector {
    property_type: Option<PropertyType>,
    location: String,
    radius_index: usize,
}

impl Default for CriteriaSelector {
    fn default() -> Self {
        Self {
            property_type: None,
            location: String::new(),
            radius_index: DEFAULT_RADIUS_INDEX,
        }
    }
}

impl CriteriaSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_property_type(&mut self, property_type: PropertyType) {
        self.property_type = Some(property_type);
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Move the radius slider. Indices past the end stick to the last option.
    pub fn set_radius_index(&mut self, index: usize) {
        self.radius_index = index.min(RADIUS_OPTIONS.len() - 1);
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn radius_index(&self) -> usize {
        self.radius_index
    }

    pub fn radius(&self) -> f64 {
        RADIUS_OPTIONS[self.radius_index]
    }

    pub fn can_submit(&self) -> bool {
        self.property_type.is_some() && !self.location.trim().is_empty()
    }

    /// Label of the search button
    pub fn submit_label(&self) -> String {
        match self.property_type {
            Some(kind) => format!("Search {}", kind),
            None => "Search Properties".to_string(),
        }
    }

    /// Build the results-page target, or `None` while the criteria are incomplete
    pub fn submit(&self) -> Option<NavigationTarget> {
        if !self.can_submit() {
            return None;
        }
        let property_type = self.property_type?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("propertyType", property_type.label())
            .append_pair("location", self.location.trim())
            .append_pair("radius", &self.radius().to_string())
            .finish();

        Some(NavigationTarget {
            path: RESULTS_PATH.to_string(),
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(kind: Option<PropertyType>, location: &str, radius_index: usize) -> CriteriaSelector {
        let mut selector = CriteriaSelector::new();
        if let Some(kind) = kind {
            selector.select_property_type(kind);
        }
        selector.set_location(location);
        selector.set_radius_index(radius_index);
        selector
    }

    #[test]
    fn defaults_to_one_mile() {
        let selector = CriteriaSelector::new();
        assert_eq!(selector.radius_index(), 3);
        assert_eq!(selector.radius(), 1.0);
        assert_eq!(selector.submit_label(), "Search Properties");
    }

    #[test]
    fn submit_encodes_all_three_values() {
        let target = selector(Some(PropertyType::Retail), "10001", 3).submit().unwrap();
        assert_eq!(target.path, "/search-results");
        assert_eq!(target.to_string(), "/search-results?propertyType=Retail&location=10001&radius=1");
    }

    #[test]
    fn submit_round_trips_through_query_parsing() {
        for (index, radius) in RADIUS_OPTIONS.iter().enumerate() {
            for kind in PropertyType::ALL {
                let target = selector(Some(kind), " 12 Elm St & Co ", index).submit().unwrap();
                let query = SearchQuery::parse(&target.to_string());
                assert_eq!(query.property_type.as_deref(), Some(kind.label()));
                assert_eq!(query.location.as_deref(), Some("12 Elm St & Co"));
                assert_eq!(query.radius, Some(*radius));
            }
        }
    }

    #[test]
    fn submit_is_a_no_op_without_required_fields() {
        for index in 0..RADIUS_OPTIONS.len() {
            assert!(selector(None, "10001", index).submit().is_none());
            assert!(selector(Some(PropertyType::Land), "", index).submit().is_none());
            assert!(selector(Some(PropertyType::Land), "   \t", index).submit().is_none());
        }
    }

    #[test]
    fn radius_index_is_clamped_to_last_option() {
        let selector = selector(Some(PropertyType::Industrial), "Austin", 99);
        assert_eq!(selector.radius_index(), RADIUS_OPTIONS.len() - 1);
        assert_eq!(selector.radius(), 50.0);
    }

    #[test]
    fn fractional_radius_is_written_without_padding() {
        let target = selector(Some(PropertyType::MultiFamily), "Austin", 0).submit().unwrap();
        assert_eq!(target.query, "propertyType=Multi+Family&location=Austin&radius=0.25");
        assert_eq!(selector(Some(PropertyType::MultiFamily), "Austin", 0).submit_label(), "Search Multi Family");
    }
}
