use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{ai::SimilarityService, backend::BackendStore, config::ProbeSettings};

/// Synthetic row used to check that the table accepts writes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeRecord {
    pub content: String,
    pub embedding: Vec<f32>,
}

impl ProbeRecord {
    pub fn placeholder(settings: &ProbeSettings) -> Self {
        Self {
            content: settings.label.clone(),
            embedding: vec![0.0; settings.dimensions],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub backend: bool,
    pub embedding: bool,
}

impl ProbeOutcome {
    pub fn success(&self) -> bool {
        self.backend && self.embedding
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}

fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Insert a placeholder row into `table`, then read one row back.
pub async fn probe_backend(
    store: &dyn BackendStore,
    table: &str,
    settings: &ProbeSettings,
) -> bool {
    let record = ProbeRecord::placeholder(settings);
    let row = match serde_json::to_value(&record) {
        Ok(row) => row,
        Err(err) => {
            error!(error = %err, "Failed to encode probe record");
            return false;
        }
    };

    let stored = match store.insert(table, &[row]).await {
        Ok(stored) => stored,
        Err(err) => {
            error!(
                table,
                error = %err,
                code = err.code.as_deref().unwrap_or(""),
                hint = err.hint.as_deref().unwrap_or(""),
                "Backend insert failed"
            );
            return false;
        }
    };

    let read_ok = match store.select(table, 1).await {
        Ok(rows) => {
            info!(table, rows = rows.len(), "Backend connection verified");
            true
        }
        Err(err) => {
            error!(
                table,
                error = %err,
                code = err.code.as_deref().unwrap_or(""),
                "Backend select failed"
            );
            false
        }
    };

    if settings.cleanup_probe_row {
        match stored.first().and_then(row_id) {
            Some(id) => {
                if let Err(err) = store.delete_eq(table, "id", &id).await {
                    warn!(table, id = %id, error = %err, "Failed to remove probe row");
                }
            }
            None => warn!(table, "Probe row has no id, leaving it in place"),
        }
    }

    read_ok
}

/// One minimal similarity request to confirm the token works.
pub async fn probe_embedding(service: &dyn SimilarityService) -> bool {
    let sentences = vec!["Connectivity check".to_string()];
    match service.similarity("Hello world", &sentences).await {
        Ok(_) => {
            info!("Inference endpoint reachable");
            true
        }
        Err(err) => {
            error!(error = %err, "Inference endpoint check failed");
            false
        }
    }
}

/// Run both probes to completion, regardless of either one failing.
pub async fn run_probes(
    store: &dyn BackendStore,
    service: &dyn SimilarityService,
    table: &str,
    settings: &ProbeSettings,
) -> ProbeOutcome {
    let (backend, embedding) = tokio::join!(
        probe_backend(store, table, settings),
        probe_embedding(service)
    );
    ProbeOutcome { backend, embedding }
}
