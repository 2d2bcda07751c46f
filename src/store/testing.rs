use crate::models::{FieldValue, RawDocument};
use crate::store::traits::{PropertyStore, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// In-memory store returning canned results. Equality queries only return
/// documents whose field holds the requested string.
pub struct FakeStore {
    result: Result<Vec<RawDocument>, StoreError>,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeStore {
    pub fn with_documents(documents: Vec<RawDocument>) -> Self {
        Self {
            result: Ok(documents),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            result: Err(error),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hold each response until a permit is added to `gate`
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// `(collection, field, value)` of each equality query received
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self) -> Result<Vec<RawDocument>, StoreError> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.result.clone()
    }
}

#[async_trait]
impl PropertyStore for FakeStore {
    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((collection.to_string(), field.to_string(), value.to_string()));
        self.respond().await.map(|docs| {
            docs.into_iter()
                .filter(|doc| matches!(doc.get(field), Some(FieldValue::String(s)) if s == value))
                .collect()
        })
    }

    async fn sample(&self, _collection: &str, limit: u32) -> Result<Vec<RawDocument>, StoreError> {
        self.respond()
            .await
            .map(|docs| docs.into_iter().take(limit as usize).collect())
    }

    fn store_name(&self) -> &'static str {
        "Fake"
    }
}
