use crate::models::RawDocument;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Classifiable failure code reported by the data store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    PermissionDenied,
    NotFound,
    Unauthenticated,
    InvalidArgument,
    Unavailable,
    Internal,
    Other(String),
}

impl ErrorCode {
    /// Map a REST status name such as `PERMISSION_DENIED`
    pub fn from_status(status: &str) -> Self {
        match status {
            "PERMISSION_DENIED" => ErrorCode::PermissionDenied,
            "NOT_FOUND" => ErrorCode::NotFound,
            "UNAUTHENTICATED" => ErrorCode::Unauthenticated,
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => ErrorCode::InvalidArgument,
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" => ErrorCode::Unavailable,
            "INTERNAL" => ErrorCode::Internal,
            other => ErrorCode::Other(other.to_lowercase().replace('_', "-")),
        }
    }

    /// Fallback when the response body carries no status name
    pub fn from_http(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthenticated,
            403 => ErrorCode::PermissionDenied,
            404 => ErrorCode::NotFound,
            400 => ErrorCode::InvalidArgument,
            503 | 504 => ErrorCode::Unavailable,
            500 => ErrorCode::Internal,
            other => ErrorCode::Other(format!("http-{}", other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::PermissionDenied => "permission-denied",
            ErrorCode::NotFound => "not-found",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
            ErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: ErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Read access to a hosted document collection
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Fetch every document whose `field` equals `value`
    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>, StoreError>;

    /// Fetch up to `limit` documents without a filter
    async fn sample(&self, collection: &str, limit: u32) -> Result<Vec<RawDocument>, StoreError>;

    /// Get the name of the backing service
    fn store_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_map_to_kebab_codes() {
        assert_eq!(ErrorCode::from_status("PERMISSION_DENIED").as_str(), "permission-denied");
        assert_eq!(ErrorCode::from_status("NOT_FOUND").as_str(), "not-found");
        assert_eq!(ErrorCode::from_status("RESOURCE_EXHAUSTED").as_str(), "resource-exhausted");
    }

    #[test]
    fn http_status_fallback() {
        assert_eq!(ErrorCode::from_http(403), ErrorCode::PermissionDenied);
        assert_eq!(ErrorCode::from_http(418).as_str(), "http-418");
    }

    #[test]
    fn error_display_includes_code_and_message() {
        let err = StoreError::new(ErrorCode::NotFound, "no database");
        assert_eq!(err.to_string(), "not-found: no database");
    }
}
