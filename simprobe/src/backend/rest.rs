use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::{BackendError, BackendResult, BackendStore};
use crate::config::Credentials;

/// Client for the PostgREST interface exposed by the managed database.
pub struct RestBackend {
    http: Client,
    base: String,
    key: String,
}

impl RestBackend {
    pub fn new(url: &str, key: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base: url.trim_end_matches('/').to_string(),
            key,
        })
    }

    pub fn from_credentials(creds: &Credentials) -> anyhow::Result<Self> {
        Self::new(&creds.backend_url, creds.backend_key.clone())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn send(&self, req: RequestBuilder) -> BackendResult<Response> {
        let resp = self
            .authed(req)
            .send()
            .await
            .map_err(BackendError::transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body))
    }

    async fn rows(resp: Response) -> BackendResult<Vec<Value>> {
        let text = resp.text().await.map_err(BackendError::transport)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(other) => Ok(vec![other]),
            Err(err) => Err(BackendError {
                message: format!("Invalid JSON from backend: {err}"),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl BackendStore for RestBackend {
    async fn insert(&self, table: &str, rows: &[Value]) -> BackendResult<Vec<Value>> {
        let req = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows);
        let stored = Self::rows(self.send(req).await?).await?;
        debug!(table, count = stored.len(), "Inserted rows");
        Ok(stored)
    }

    async fn select(&self, table: &str, limit: usize) -> BackendResult<Vec<Value>> {
        let req = self
            .http
            .get(self.table_url(table))
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())]);
        Self::rows(self.send(req).await?).await
    }

    async fn delete_eq(&self, table: &str, column: &str, value: &str) -> BackendResult<()> {
        let req = self
            .http
            .delete(self.table_url(table))
            .query(&[(column, format!("eq.{value}"))]);
        self.send(req).await?;
        debug!(table, column, value, "Deleted rows");
        Ok(())
    }
}
