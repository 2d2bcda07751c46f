pub mod firestore;
pub mod probe;
pub mod traits;

pub use firestore::FirestoreClient;
pub use probe::{probe, ProbeResult, PROPERTIES_COLLECTION};
pub use traits::{ErrorCode, PropertyStore, StoreError};

#[cfg(test)]
pub mod testing;
