use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod rest;

pub use rest::RestBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Error as reported by the backend (PostgREST error body) or by the transport.
#[derive(Debug, Clone, Default, Error, PartialEq)]
#[error("{message}")]
pub struct BackendError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl BackendError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            ..Default::default()
        }
    }

    /// Build from a non-2xx response body. Falls back to the raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let field = |v: &Value, name: &str| -> Option<String> {
            match v.get(name)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }
        };

        match serde_json::from_str::<Value>(body) {
            Ok(v) if v.is_object() => Self {
                status: Some(status),
                code: field(&v, "code"),
                message: field(&v, "message").unwrap_or_else(|| body.to_string()),
                details: field(&v, "details"),
                hint: field(&v, "hint"),
            },
            _ => Self {
                status: Some(status),
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                },
                ..Default::default()
            },
        }
    }
}

/// Table-scoped operations of the managed database.
#[async_trait]
pub trait BackendStore: Send + Sync {
    /// Insert rows and return them as stored.
    async fn insert(&self, table: &str, rows: &[Value]) -> BackendResult<Vec<Value>>;

    async fn select(&self, table: &str, limit: usize) -> BackendResult<Vec<Value>>;

    /// Delete rows where `column` equals `value`.
    async fn delete_eq(&self, table: &str, column: &str, value: &str) -> BackendResult<()>;
}
