use crate::models::{FieldValue, PropertyRecord, RawDocument};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Turn a stored document into a table row.
///
/// Documents without a non-empty `address` and `propertyType` are dropped.
/// Every other field degrades: numbers fall back to 0 and `saleDate` falls
/// back to `now`.
pub fn normalize(doc: &RawDocument, now: DateTime<Utc>) -> Option<PropertyRecord> {
    let address = required_text(doc, "address")?;
    let property_type = required_text(doc, "propertyType")?;

    Some(PropertyRecord {
        id: doc.id.clone(),
        address,
        sale_date: sale_date(doc.get("saleDate"), now),
        actual_cap_rate: number(doc.get("actualCapRate")),
        price_per_unit: number(doc.get("pricePerUnit")),
        number_of_units: number(doc.get("numberOfUnits")),
        year_built: number(doc.get("yearBuilt")),
        property_type,
        total_square_feet: number(doc.get("totalSquareFeet")),
    })
}

/// Normalize a batch in fetch order, skipping documents that fail validation
pub fn normalize_all(docs: &[RawDocument], now: DateTime<Utc>) -> Vec<PropertyRecord> {
    let records: Vec<PropertyRecord> = docs
        .iter()
        .filter_map(|doc| {
            let record = normalize(doc, now);
            if record.is_none() {
                warn!("Document {} is missing required fields", doc.id);
            }
            record
        })
        .collect();

    debug!("Processed {} valid properties out of {} documents", records.len(), docs.len());
    records
}

fn required_text(doc: &RawDocument, field: &str) -> Option<String> {
    match doc.get(field) {
        Some(FieldValue::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Loose numeric coercion: anything that is not a finite number becomes 0
fn number(value: Option<&FieldValue>) -> f64 {
    let coerced = match value {
        Some(FieldValue::Integer(i)) => *i as f64,
        Some(FieldValue::Double(d)) => *d,
        Some(FieldValue::Boolean(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(FieldValue::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if coerced.is_finite() {
        coerced
    } else {
        0.0
    }
}

fn sale_date(value: Option<&FieldValue>, now: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Some(FieldValue::Timestamp(ts)) => *ts,
        Some(FieldValue::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now),
        _ => now,
    }
}
