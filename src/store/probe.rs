use crate::store::traits::{ErrorCode, PropertyStore, StoreError};
use tracing::{error, info};

pub const PROPERTIES_COLLECTION: &str = "properties";

/// Result of a one-document connectivity check
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    Connected,
    ConnectedEmpty,
    Failed(StoreError),
}

/// Fetch a single document from the properties collection to verify access
pub async fn probe(store: &dyn PropertyStore) -> ProbeResult {
    info!("Testing {} connection...", store.store_name());

    match store.sample(PROPERTIES_COLLECTION, 1).await {
        Ok(docs) if docs.is_empty() => {
            info!("Connected to {}, but '{}' collection is empty", store.store_name(), PROPERTIES_COLLECTION);
            ProbeResult::ConnectedEmpty
        }
        Ok(_) => {
            info!("Connected to {} and fetched data from '{}'", store.store_name(), PROPERTIES_COLLECTION);
            ProbeResult::Connected
        }
        Err(err) => {
            if err.code == ErrorCode::PermissionDenied {
                error!("Failed to connect to {}: permission denied, check the security rules", store.store_name());
            } else {
                error!("Failed to connect to {}: {}", store.store_name(), err);
            }
            ProbeResult::Failed(err)
        }
    }
}
