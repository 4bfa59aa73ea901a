use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::DEFAULT_ENDPOINT;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Inference endpoint returned {status}{}", detail(.body))]
    Remote {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Expected {expected} scores, endpoint returned {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl SimilarityError {
    /// Remote error payload, when the endpoint sent one.
    pub fn remote_body(&self) -> Option<&Value> {
        match self {
            SimilarityError::Remote { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

fn detail(body: &Option<Value>) -> String {
    body.as_ref().map(|b| format!(": {b}")).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityRequest<'a> {
    pub inputs: SimilarityInputs<'a>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityInputs<'a> {
    pub source_sentence: &'a str,
    pub sentences: &'a [String],
}

/// One score per compared sentence, in request order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SimilarityScores(pub Vec<f64>);

impl SimilarityScores {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
pub trait SimilarityService: Send + Sync {
    async fn similarity(
        &self,
        source: &str,
        sentences: &[String],
    ) -> Result<SimilarityScores, SimilarityError>;
}

pub struct SimilarityClient {
    http: Client,
    token: String,
    endpoint: String,
}

impl SimilarityClient {
    pub fn new(token: String, endpoint: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            token,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
    }

    async fn request_scores(
        &self,
        source: &str,
        sentences: &[String],
    ) -> Result<SimilarityScores, SimilarityError> {
        let body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: source,
                sentences,
            },
        };

        let resp = self.post_json(&body).await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let body = (!text.trim().is_empty())
                .then(|| serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text)));
            return Err(SimilarityError::Remote { status, body });
        }

        let scores: SimilarityScores =
            serde_json::from_str(&text).map_err(|err| SimilarityError::Decode(err.to_string()))?;
        if scores.len() != sentences.len() {
            return Err(SimilarityError::LengthMismatch {
                expected: sentences.len(),
                actual: scores.len(),
            });
        }
        debug!(count = scores.len(), "Received similarity scores");
        Ok(scores)
    }
}

#[async_trait]
impl SimilarityService for SimilarityClient {
    async fn similarity(
        &self,
        source: &str,
        sentences: &[String],
    ) -> Result<SimilarityScores, SimilarityError> {
        self.request_scores(source, sentences)
            .await
            .inspect_err(|err| match err.remote_body() {
                Some(body) => error!(%body, "Error getting similarity scores"),
                None => error!(error = %err, "Error getting similarity scores"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_inference_api_shape() {
        let sentences = vec!["a".to_string(), "b".to_string()];
        let body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: "q",
                sentences: &sentences,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"inputs": {"source_sentence": "q", "sentences": ["a", "b"]}})
        );
    }

    #[test]
    fn scores_deserialize_from_bare_array() {
        let scores: SimilarityScores = serde_json::from_str("[0.5, -0.25]").unwrap();
        assert_eq!(scores.as_slice(), &[0.5, -0.25]);
    }
}
