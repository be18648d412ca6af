use crate::domain::error::EmbeddingError;
use crate::domain::ports::embedding_port::{check_dimension, EmbeddingProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Handle;

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint (OpenAI itself,
/// or a local inference server hosting all-MiniLM-L6-v2).
///
/// `encode` blocks on the captured runtime handle, so it must run on a
/// worker-pool thread, never inside an async task.
pub struct RemoteProvider {
    client: Client,
    runtime: Handle,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
    loaded: AtomicBool,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl RemoteProvider {
    /// Must be called from within a tokio runtime.
    pub fn new(
        runtime: Handle,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            runtime,
            api_key,
            model: model.unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
            base_url: base_url
                .unwrap_or_else(|| "http://127.0.0.1:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            dimension,
            loaded: AtomicBool::new(false),
        }
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let mut req = self.client.post(&url).json(&EmbeddingRequest {
            input: texts.to_vec(),
            model: self.model.clone(),
        });
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| EmbeddingError::EncodingFailure(format!("Embedding API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::EncodingFailure(format!(
                "Embedding API {status}: {body}"
            )));
        }

        let result: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| EmbeddingError::EncodingFailure(format!("Parse error: {e}")))?;
        if result.data.len() != texts.len() {
            return Err(EmbeddingError::EncodingFailure(format!(
                "Embedding API returned {} vectors for {} inputs",
                result.data.len(),
                texts.len()
            )));
        }
        result
            .data
            .into_iter()
            .map(|d| check_dimension(d.embedding, self.dimension))
            .collect()
    }
}

impl EmbeddingProvider for RemoteProvider {
    fn name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Nothing to download; readiness is confirmed by the startup probe encode.
    fn load(&self) -> Result<(), EmbeddingError> {
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.encode_batch(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::EncodingFailure("empty embedding response".into()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if !self.is_loaded() {
            return Err(EmbeddingError::ModelNotLoaded);
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.runtime.block_on(self.request(texts))
    }
}
