use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Connection settings for the hosted property database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_domain: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub database: String,
    pub endpoint: String,
}

impl StoreConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Required values that are unset or blank
    /// fail immediately.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            api_key: required("FIREBASE_API_KEY")?,
            project_id: required("FIREBASE_PROJECT_ID")?,
            auth_domain: required("FIREBASE_AUTH_DOMAIN")?,
            storage_bucket: optional("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: optional("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: optional("FIREBASE_APP_ID"),
            database: optional("FIRESTORE_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            endpoint: optional("FIRESTORE_ENDPOINT")
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_required_and_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "comps"),
            ("FIREBASE_AUTH_DOMAIN", "comps.firebaseapp.com"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "comps");
        assert_eq!(config.database, "(default)");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.app_id, None);
    }

    #[test]
    fn missing_value_fails_fast() {
        let err = StoreConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_AUTH_DOMAIN", "comps.firebaseapp.com"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("FIREBASE_PROJECT_ID"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = StoreConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "  "),
            ("FIREBASE_PROJECT_ID", "comps"),
            ("FIREBASE_AUTH_DOMAIN", "comps.firebaseapp.com"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "missing required environment variable FIREBASE_API_KEY");
    }

    #[test]
    fn endpoint_override_drops_trailing_slash() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "comps"),
            ("FIREBASE_AUTH_DOMAIN", "comps.firebaseapp.com"),
            ("FIRESTORE_ENDPOINT", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080");
    }
}
