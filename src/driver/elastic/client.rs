//! Search-client abstraction the Elasticsearch driver talks through.
//!
//! Transport, connection pooling and retries belong to the client; the
//! driver only builds request bodies and reads responses.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Connection parameters forwarded to the client constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticConfig {
    /// Backend host name.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Index holding every category.
    pub index: String,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        ElasticConfig {
            host: "localhost".to_string(),
            port: 9200,
            index: "default".to_string(),
        }
    }
}

impl ElasticConfig {
    /// Base URL of the backend.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Low-level Elasticsearch operations.
///
/// Every method returns the raw JSON response body. Implementations report
/// transport failures as errors; a missing document on delete may be
/// reported either as a `NotFound` error or as a `"result": "not_found"`
/// response.
pub trait SearchClient: Send + Sync + fmt::Debug {
    /// Run a `_search` request against `index`, restricted to `types`
    /// (every type when empty).
    fn search(&self, index: &str, types: &[&str], body: &Value) -> Result<Value>;

    /// Index one document.
    fn index(&self, index: &str, doc_type: &str, id: &str, body: &Value) -> Result<Value>;

    /// Send a `_bulk` request; `operations` are the NDJSON lines in order.
    fn bulk(&self, operations: &[Value]) -> Result<Value>;

    /// Delete one document.
    fn delete(&self, index: &str, doc_type: &str, id: &str) -> Result<Value>;

    /// Make recent writes to `index` searchable.
    fn refresh(&self, index: &str) -> Result<()>;
}

/// Builds a client from connection parameters.
pub type ClientConnector = dyn Fn(&ElasticConfig) -> Result<Arc<dyn SearchClient>> + Send + Sync;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ElasticConfig::default();
        assert_eq!(config.base_url(), "http://localhost:9200");
        assert_eq!(config.index, "default");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ElasticConfig = serde_json::from_str(r#"{"port": 9201}"#).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9201);
    }
}
