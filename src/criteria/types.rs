use thiserror::Error;
use url::form_urlencoded;

/// Parameters decoded from a results-page navigation target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Value matched against the `propertyType` field
    pub property_type: Option<String>,
    /// Address or ZIP code entered by the user
    pub location: Option<String>,
    /// Search radius in miles
    pub radius: Option<f64>,
}

/// Search parameters with both required values present
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredQuery<'a> {
    pub property_type: &'a str,
    pub location: &'a str,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Missing required search parameters")]
    Missing,
}

impl SearchQuery {
    /// Decode a query string. A leading path and `?` are tolerated so a full
    /// navigation target can be passed as-is.
    pub fn parse(input: &str) -> Self {
        let input = input.split('#').next().unwrap_or_default();
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None if input.starts_with('/') => "",
            None => input,
        };

        let mut parsed = SearchQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "propertyType" if parsed.property_type.is_none() => {
                    parsed.property_type = Some(value.into_owned());
                }
                "location" if parsed.location.is_none() => {
                    parsed.location = Some(value.into_owned());
                }
                "radius" if parsed.radius.is_none() => {
                    parsed.radius = value.trim().parse::<f64>().ok().filter(|r| r.is_finite());
                }
                _ => {}
            }
        }
        parsed
    }

    /// Both property type and location must be present and non-empty
    pub fn require(&self) -> Result<RequiredQuery<'_>, ParamError> {
        let property_type = self
            .property_type
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(ParamError::Missing)?;
        let location = self
            .location
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(ParamError::Missing)?;

        Ok(RequiredQuery {
            property_type,
            location,
            radius: self.radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_navigation_target() {
        let query = SearchQuery::parse("/search-results?propertyType=Multi+Family&location=10001&radius=0.25");
        assert_eq!(query.property_type.as_deref(), Some("Multi Family"));
        assert_eq!(query.location.as_deref(), Some("10001"));
        assert_eq!(query.radius, Some(0.25));
    }

    #[test]
    fn parses_bare_query_and_decodes_percent_escapes() {
        let query = SearchQuery::parse("propertyType=Retail&location=12%20Elm%20St%2C%20Boston");
        assert_eq!(query.location.as_deref(), Some("12 Elm St, Boston"));
        assert_eq!(query.radius, None);
    }

    #[test]
    fn first_occurrence_wins() {
        let query = SearchQuery::parse("?propertyType=Land&propertyType=Retail");
        assert_eq!(query.property_type.as_deref(), Some("Land"));
    }

    #[test]
    fn path_without_query_has_no_parameters() {
        assert_eq!(SearchQuery::parse("/search-results"), SearchQuery::default());
    }

    #[test]
    fn require_rejects_missing_or_empty_values() {
        assert_eq!(
            SearchQuery::parse("propertyType=Retail").require(),
            Err(ParamError::Missing)
        );
        assert_eq!(
            SearchQuery::parse("propertyType=&location=10001").require(),
            Err(ParamError::Missing)
        );
        assert_eq!(
            ParamError::Missing.to_string(),
            "Missing required search parameters"
        );
    }

    #[test]
    fn require_keeps_radius_optional() {
        let query = SearchQuery::parse("propertyType=Retail&location=10001&radius=abc");
        let required = query.require().unwrap();
        assert_eq!(required.property_type, "Retail");
        assert_eq!(required.radius, None);
    }
}
