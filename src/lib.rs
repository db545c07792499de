//! TEI Client - Library Entry Point
//!
//! Typed async client for the HTTP API of a text-embeddings-inference
//! server: embeddings, sparse embeddings, classification, reranking,
//! tokenization and decoding, plus health, info and metrics.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types
pub use clients::TeiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{
    DecodeRequest, EmbedAllRequest, EmbedRequest, EmbedResponse, EmbedSparseRequest, ErrorPayload,
    ErrorType, InfoResponse, ModelType, PredictRequest, Prediction, Rank, RerankRequest,
    SimpleToken, SparseValue, TokenizeRequest,
};
pub use traits::EmbeddingService;
