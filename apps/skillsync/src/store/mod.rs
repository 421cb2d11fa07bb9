//! Query Store — thin client for the N1QL query service that holds the skill
//! taxonomy and candidate records.
//!
//! Every statement is a standalone HTTP request. There is no transaction
//! primitive, so callers that issue several writes must tolerate partial success.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub mod statements;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store response malformed: {0}")]
    ResponseMalformed(String),
}

/// A N1QL statement plus its named parameters. Parameters are sent as
/// top-level `$name` fields in the request body.
#[derive(Debug, Clone)]
pub struct Query {
    pub statement: String,
    pub params: Map<String, Value>,
}

impl Query {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            params: Map::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("statement".to_string(), Value::String(self.statement.clone()));
        for (name, value) in &self.params {
            body.insert(format!("${name}"), value.clone());
        }
        Value::Object(body)
    }
}

/// The read/write capability the pipeline needs from the document store.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Executes one statement and returns its `results` rows.
    async fn execute(&self, query: &Query) -> Result<Vec<Value>, StoreError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

/// HTTP client for a Couchbase-style query service (`/query/service`).
#[derive(Clone)]
pub struct CouchbaseClient {
    client: Client,
    endpoint: String,
    user: String,
    password: String,
}

impl CouchbaseClient {
    pub fn new(endpoint: String, user: String, password: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            user,
            password,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.store_endpoint.clone(),
            config.store_user.clone(),
            config.store_password.clone(),
        )
    }
}

#[async_trait]
impl QueryStore for CouchbaseClient {
    async fn execute(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        debug!("N1QL: {}", query.statement);

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .json(&query.to_body())
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            warn!("Query service returned {}: {}", status, body);
            return Err(StoreError::Unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::ResponseMalformed(format!("{e}: {body}")))?;

        if let Some(query_status) = parsed.status.as_deref() {
            if query_status != "success" {
                return Err(StoreError::Unavailable(format!(
                    "query status '{}': {}",
                    query_status,
                    Value::Array(parsed.errors)
                )));
            }
        }

        Ok(parsed.results)
    }
}
