//! Wire types for the inference server API.
//!
//! Request types serialize to the JSON bodies the server expects; response
//! types mirror what it sends back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request for `/embed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// The text to embed. Must not be empty.
    pub inputs: String,
    /// Let the server cut inputs longer than the model's max length.
    pub truncate: bool,
}

impl EmbedRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            truncate: false,
        }
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

/// One dense vector per input.
pub type EmbedResponse = Vec<Vec<f32>>;

/// Request for `/embed_all`: per-token embeddings, no pooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedAllRequest {
    pub inputs: Vec<String>,
    pub truncate: bool,
}

impl EmbedAllRequest {
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            truncate: false,
        }
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

/// Request for `/embed_sparse` (SPLADE pooling, when the model supports it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedSparseRequest {
    pub inputs: Vec<String>,
    pub truncate: bool,
}

impl EmbedSparseRequest {
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            truncate: false,
        }
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

/// A non-zero entry of a sparse embedding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparseValue {
    pub index: usize,
    pub value: f32,
}

/// Request for `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub inputs: String,
}

impl PredictRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
        }
    }
}

/// A classifier label with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// Request for `/rerank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankRequest {
    pub query: String,
    pub texts: Vec<String>,
}

impl RerankRequest {
    pub fn new(query: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            query: query.into(),
            texts,
        }
    }
}

/// A reranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    /// Position of the candidate in the request's `texts`.
    pub index: usize,
    pub score: f32,
    /// Filled in by the client from the request's `texts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Request for `/tokenize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub inputs: Vec<String>,
    pub add_special_tokens: bool,
}

impl TokenizeRequest {
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            add_special_tokens: true,
        }
    }

    pub fn add_special_tokens(mut self, add: bool) -> Self {
        self.add_special_tokens = add;
        self
    }
}

/// A token with its character offsets in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleToken {
    pub id: u32,
    pub text: String,
    pub special: bool,
    pub start: Option<usize>,
    pub stop: Option<usize>,
}

/// Request for `/decode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub ids: Vec<Vec<u32>>,
    pub skip_special_tokens: bool,
}

impl DecodeRequest {
    pub fn new(ids: Vec<Vec<u32>>) -> Self {
        Self {
            ids,
            skip_special_tokens: true,
        }
    }

    pub fn skip_special_tokens(mut self, skip: bool) -> Self {
        self.skip_special_tokens = skip;
        self
    }
}

/// Server metadata returned by `/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub model_id: String,
    #[serde(default)]
    pub model_sha: Option<String>,
    pub model_dtype: String,
    #[serde(default)]
    pub model_type: Option<ModelType>,
    pub max_concurrent_requests: usize,
    pub max_input_length: usize,
    pub max_batch_tokens: usize,
    #[serde(default)]
    pub max_batch_requests: Option<usize>,
    pub max_client_batch_size: usize,
    pub tokenization_workers: usize,
    pub version: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub docker_label: Option<String>,
}

/// What kind of model the server is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Embedding(EmbeddingModel),
    Classifier(ClassifierModel),
    Reranker(ClassifierModel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingModel {
    pub pooling: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, usize>,
}

/// The `error_type` tag of an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorType {
    Validation,
    Tokenizer,
    Backend,
    Overloaded,
    Unhealthy,
    /// Any tag this client does not know, kept verbatim.
    Other(String),
}

impl ErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Validation => "validation",
            Self::Tokenizer => "tokenizer",
            Self::Backend => "backend",
            Self::Overloaded => "overloaded",
            Self::Unhealthy => "unhealthy",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ErrorType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "validation" => Self::Validation,
            "tokenizer" => Self::Tokenizer,
            "backend" => Self::Backend,
            "overloaded" => Self::Overloaded,
            "unhealthy" => Self::Unhealthy,
            _ => Self::Other(tag),
        }
    }
}

impl From<ErrorType> for String {
    fn from(tag: ErrorType) -> Self {
        match tag {
            ErrorType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Body of every non-200 response (except `/health`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    pub error_type: ErrorType,
}
