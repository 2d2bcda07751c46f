use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Property category offered by the criteria selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    MultiFamily,
    Retail,
    Industrial,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::MultiFamily,
        PropertyType::Retail,
        PropertyType::Industrial,
        PropertyType::Land,
    ];

    /// Label stored in the `propertyType` field of each document
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::MultiFamily => "Multi Family",
            PropertyType::Retail => "Retail",
            PropertyType::Industrial => "Industrial",
            PropertyType::Land => "Land",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "multifamily" => Ok(PropertyType::MultiFamily),
            "retail" => Ok(PropertyType::Retail),
            "industrial" => Ok(PropertyType::Industrial),
            "land" => Ok(PropertyType::Land),
            _ => Err(format!(
                "unknown property type '{}' (expected one of: Multi Family, Retail, Industrial, Land)",
                s
            )),
        }
    }
}

/// Untyped value of a stored document field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

/// Document as returned by the data store, before validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDocument {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Comparable sale row shown in the results table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    pub address: String,
    pub sale_date: DateTime<Utc>,
    pub actual_cap_rate: f64,
    pub price_per_unit: f64,
    pub number_of_units: f64,
    pub year_built: f64,
    pub property_type: String,
    pub total_square_feet: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_labels_and_slugs() {
        assert_eq!("Multi Family".parse::<PropertyType>(), Ok(PropertyType::MultiFamily));
        assert_eq!("multi-family".parse::<PropertyType>(), Ok(PropertyType::MultiFamily));
        assert_eq!("RETAIL".parse::<PropertyType>(), Ok(PropertyType::Retail));
        assert!("Office".parse::<PropertyType>().is_err());
    }

    #[test]
    fn labels_round_trip_through_display() {
        for kind in PropertyType::ALL {
            assert_eq!(kind.to_string().parse::<PropertyType>(), Ok(kind));
        }
    }

    #[test]
    fn record_serializes_with_store_field_names() {
        let record = PropertyRecord {
            id: "abc".to_string(),
            address: "1 Main St".to_string(),
            sale_date: Utc::now(),
            actual_cap_rate: 5.5,
            price_per_unit: 120_000.0,
            number_of_units: 8.0,
            year_built: 1985.0,
            property_type: "Retail".to_string(),
            total_square_feet: 9_000.0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["actualCapRate"], 5.5);
        assert_eq!(json["propertyType"], "Retail");
        assert!(json.get("saleDate").is_some());
    }
}
