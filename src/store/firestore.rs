use crate::config::StoreConfig;
use crate::models::{FieldValue, RawDocument};
use crate::store::traits::{ErrorCode, PropertyStore, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Firestore REST client
pub struct FirestoreClient {
    client: Client,
    config: StoreConfig,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<RestDocument>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreClient {
    /// Create a client for the configured project
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("comps-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents:runQuery",
            self.config.endpoint, self.config.project_id, self.config.database
        )
    }

    async fn run_query(&self, structured_query: Value) -> Result<Vec<RawDocument>, StoreError> {
        let url = self.run_query_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&json!({ "structuredQuery": structured_query }))
            .send()
            .await
            .map_err(|e| transport_error("request failed", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("failed to read response body", &e))?;

        if !status.is_success() {
            warn!("Firestore returned status: {}", status);
            return Err(error_from_body(status.as_u16(), &body));
        }

        debug!("Downloaded {} bytes of query results", body.len());
        decode_run_query(&body)
    }
}

#[async_trait]
impl PropertyStore for FirestoreClient {
    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>, StoreError> {
        info!("Querying {} where {} == {:?}", collection, field, value);

        let query = json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": { "stringValue": value }
                }
            }
        });
        self.run_query(query).await
    }

    async fn sample(&self, collection: &str, limit: u32) -> Result<Vec<RawDocument>, StoreError> {
        debug!("Sampling {} document(s) from {}", limit, collection);

        let query = json!({
            "from": [{ "collectionId": collection }],
            "limit": limit
        });
        self.run_query(query).await
    }

    fn store_name(&self) -> &'static str {
        "Firestore"
    }
}

/// Describe a transport failure. The request URL carries the API key, so
/// only reqwest's classification is reported.
fn transport_error(context: &str, err: &reqwest::Error) -> StoreError {
    let reason = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect to the property database"
    } else if err.is_decode() || err.is_body() {
        "response body could not be read"
    } else {
        "network error"
    };
    debug!("{}: {} (timeout: {}, connect: {})", context, reason, err.is_timeout(), err.is_connect());
    StoreError::new(ErrorCode::Unavailable, format!("{}: {}", context, reason))
}

fn error_from_body(http_status: u16, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .or_else(|_| {
            serde_json::from_str::<Vec<ErrorEnvelope>>(body)
                .map_err(|_| ())
                .and_then(|mut v| if v.is_empty() { Err(()) } else { Ok(v.remove(0).error) })
        });

    match parsed {
        Ok(error) => to_store_error(error, http_status),
        Err(_) => StoreError::new(
            ErrorCode::from_http(http_status),
            format!("request failed with HTTP {}", http_status),
        ),
    }
}

fn to_store_error(error: ErrorBody, http_status: u16) -> StoreError {
    let code = match error.status.as_deref() {
        Some(status) => ErrorCode::from_status(status),
        None => ErrorCode::from_http(error.code.unwrap_or(http_status)),
    };
    StoreError::new(code, error.message.unwrap_or_default())
}

/// Decode a `:runQuery` response body into raw documents
fn decode_run_query(body: &str) -> Result<Vec<RawDocument>, StoreError> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body)
        .map_err(|e| StoreError::new(ErrorCode::Internal, format!("malformed query response: {}", e)))?;

    let mut documents = Vec::new();
    for item in items {
        if let Some(error) = item.error {
            return Err(to_store_error(error, 500));
        }
        if let Some(doc) = item.document {
            documents.push(decode_document(doc));
        }
    }
    Ok(documents)
}

fn decode_document(doc: RestDocument) -> RawDocument {
    let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
    RawDocument {
        id,
        fields: decode_fields(&doc.fields),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> BTreeMap<String, FieldValue> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), decode_value(value)))
        .collect()
}

/// Convert one typed REST value (`{"stringValue": "..."}` etc.)
fn decode_value(value: &Value) -> FieldValue {
    let Some(object) = value.as_object() else {
        return FieldValue::Null;
    };
    let Some((kind, inner)) = object.iter().next() else {
        return FieldValue::Null;
    };

    match kind.as_str() {
        "nullValue" => FieldValue::Null,
        "booleanValue" => inner.as_bool().map(FieldValue::Boolean).unwrap_or(FieldValue::Null),
        "integerValue" => match inner {
            Value::String(s) => s.parse().map(FieldValue::Integer).unwrap_or(FieldValue::Null),
            Value::Number(n) => n.as_i64().map(FieldValue::Integer).unwrap_or(FieldValue::Null),
            _ => FieldValue::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => n.as_f64().map(FieldValue::Double).unwrap_or(FieldValue::Null),
            Value::String(s) => match s.as_str() {
                "NaN" => FieldValue::Double(f64::NAN),
                "Infinity" => FieldValue::Double(f64::INFINITY),
                "-Infinity" => FieldValue::Double(f64::NEG_INFINITY),
                _ => FieldValue::Null,
            },
            _ => FieldValue::Null,
        },
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| FieldValue::Timestamp(dt.with_timezone(&Utc)))
            .unwrap_or(FieldValue::Null),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .unwrap_or(FieldValue::Null),
        "geoPointValue" => {
            let mut point = BTreeMap::new();
            for axis in ["latitude", "longitude"] {
                if let Some(v) = inner.get(axis).and_then(Value::as_f64) {
                    point.insert(axis.to_string(), FieldValue::Double(v));
                }
            }
            FieldValue::Map(point)
        }
        "arrayValue" => FieldValue::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => FieldValue::Map(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        other => {
            debug!("Unsupported Firestore value type: {}", other);
            FieldValue::Null
        }
    }
}
