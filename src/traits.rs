//! Core trait for inference server clients.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    DecodeRequest, EmbedAllRequest, EmbedRequest, EmbedResponse, EmbedSparseRequest,
    InfoResponse, PredictRequest, Prediction, Rank, RerankRequest, SimpleToken, SparseValue,
    TokenizeRequest,
};

/// The operations exposed by a text-embeddings-inference server.
///
/// Each call is one independent round trip. Implementations hold no per-call
/// state and can be shared across tasks.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Server metadata.
    async fn info(&self) -> Result<InfoResponse>;

    /// `true` when the server answers `/health` with 200. Any other status is
    /// `false`, not an error.
    async fn health(&self) -> Result<bool>;

    /// Prometheus metrics, as raw text.
    async fn metrics(&self) -> Result<String>;

    /// Pooled embedding of a single, non-empty input.
    async fn embed(&self, request: EmbedRequest) -> Result<EmbedResponse>;

    /// Per-token embeddings, one matrix per input.
    async fn embed_all(&self, request: EmbedAllRequest) -> Result<Vec<Vec<Vec<f32>>>>;

    /// Sparse embeddings, one list of non-zero entries per input.
    async fn embed_sparse(&self, request: EmbedSparseRequest) -> Result<Vec<Vec<SparseValue>>>;

    /// Classifier predictions.
    async fn predict(&self, request: PredictRequest) -> Result<Vec<Prediction>>;

    /// Score `texts` against `query`. Every returned rank carries its text.
    async fn rerank(&self, request: RerankRequest) -> Result<Vec<Rank>>;

    async fn tokenize(&self, request: TokenizeRequest) -> Result<Vec<Vec<SimpleToken>>>;

    async fn decode(&self, request: DecodeRequest) -> Result<Vec<String>>;
}
