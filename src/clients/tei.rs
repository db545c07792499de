//! HTTP client for a text-embeddings-inference server.
//!
//! All endpoints go through the same preparation and error decoding; they
//! differ only in path, payload and response shape.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{
    DecodeRequest, EmbedAllRequest, EmbedRequest, EmbedResponse, EmbedSparseRequest,
    ErrorPayload, InfoResponse, PredictRequest, Prediction, Rank, RerankRequest, SimpleToken,
    SparseValue, TokenizeRequest,
};
use crate::traits::EmbeddingService;

/// Client for the inference server HTTP API.
///
/// Cloning is cheap and clones share the connection pool.
///
/// ```no_run
/// use tei_client::{EmbedRequest, EmbeddingService, TeiClient};
///
/// # async fn run() -> tei_client::Result<()> {
/// let client = TeiClient::with_base_url("http://localhost:8080")?;
/// let embeddings = client.embed(EmbedRequest::new("Hi there!")).await?;
/// println!("dimension: {}", embeddings[0].len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TeiClient {
    client: Client,
    config: ClientConfig,
}

impl TeiClient {
    /// Create a client from `config`. No network I/O happens here.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Create a client with no extra headers, cookies or timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers sent on every request: JSON content type, then the configured
    /// headers (replacing defaults of the same name), then the cookies.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        if !self.config.cookies.is_empty() {
            let mut cookie = self
                .config
                .cookies
                .iter()
                .map(|(name, value)| {
                    format!("{}={}", sanitize_cookie_name(name), sanitize_cookie_value(value))
                })
                .collect::<Vec<_>>()
                .join("; ");

            // Cookies are appended to an explicitly configured Cookie header.
            if let Some(existing) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
                cookie = format!("{}; {}", existing, cookie);
            }

            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| ClientError::InvalidHeader(format!("Cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        Ok(headers)
    }

    fn prepare(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let headers = self.default_headers()?;
        Ok(self
            .client
            .request(method, self.config.endpoint(path))
            .headers(headers))
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Response> {
        let mut request = self.prepare(method.clone(), path)?;
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;

        debug!(
            method = %method,
            path,
            status = response.status().as_u16(),
            "TEI request completed"
        );

        Ok(response)
    }

    /// Read the body of a 200 response, or turn any other status into an
    /// error via the server's error payload.
    async fn read_body(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            return Err(Self::error_from_body(status, &body));
        }

        Ok(body.to_vec())
    }

    fn error_from_body(status: StatusCode, body: &[u8]) -> ClientError {
        match serde_json::from_slice::<ErrorPayload>(body) {
            Ok(payload) => ClientError::from_payload(status.as_u16(), payload),
            Err(e) => ClientError::ResponseDecode(e),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        let body = Self::read_body(response).await?;
        serde_json::from_slice(&body).map_err(ClientError::ResponseDecode)
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request).map_err(ClientError::RequestEncode)?;
        let response = self.execute(Method::POST, path, Some(payload)).await?;
        let body = Self::read_body(response).await?;
        serde_json::from_slice(&body).map_err(ClientError::ResponseDecode)
    }
}

/// Line breaks become `-`; `;` and `=` are dropped so a name cannot start
/// another cookie.
fn sanitize_cookie_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ';' | '='))
        .map(|c| if matches!(c, '\n' | '\r') { '-' } else { c })
        .collect()
}

/// Keep only printable ASCII other than `"`, `;` and `\`. Values with a
/// space or comma are quoted.
fn sanitize_cookie_value(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|&c| (' '..='~').contains(&c) && !matches!(c, '"' | ';' | '\\'))
        .collect();

    if cleaned.contains([' ', ',']) {
        format!("\"{}\"", cleaned)
    } else {
        cleaned
    }
}

/// Join each rank with the request text it points at.
fn attach_texts(ranks: &mut [Rank], texts: &[String]) -> Result<()> {
    for rank in ranks.iter_mut() {
        let text = texts.get(rank.index).ok_or_else(|| {
            ClientError::decode(format!(
                "rank index {} out of range for {} texts",
                rank.index,
                texts.len()
            ))
        })?;
        rank.text = Some(text.clone());
    }
    Ok(())
}

#[async_trait]
impl EmbeddingService for TeiClient {
    async fn info(&self) -> Result<InfoResponse> {
        self.get_json("info").await
    }

    async fn health(&self) -> Result<bool> {
        let response = self.execute(Method::GET, "health", None).await?;
        Ok(response.status() == StatusCode::OK)
    }

    async fn metrics(&self) -> Result<String> {
        let response = self.execute(Method::GET, "metrics", None).await?;
        let body = Self::read_body(response).await?;
        String::from_utf8(body).map_err(ClientError::decode)
    }

    async fn embed(&self, request: EmbedRequest) -> Result<EmbedResponse> {
        if request.inputs.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        self.post_json("embed", &request).await
    }

    async fn embed_all(&self, request: EmbedAllRequest) -> Result<Vec<Vec<Vec<f32>>>> {
        self.post_json("embed_all", &request).await
    }

    async fn embed_sparse(&self, request: EmbedSparseRequest) -> Result<Vec<Vec<SparseValue>>> {
        self.post_json("embed_sparse", &request).await
    }

    async fn predict(&self, request: PredictRequest) -> Result<Vec<Prediction>> {
        self.post_json("predict", &request).await
    }

    async fn rerank(&self, request: RerankRequest) -> Result<Vec<Rank>> {
        let mut ranks: Vec<Rank> = self.post_json("rerank", &request).await?;
        attach_texts(&mut ranks, &request.texts)?;
        Ok(ranks)
    }

    async fn tokenize(&self, request: TokenizeRequest) -> Result<Vec<Vec<SimpleToken>>> {
        self.post_json("tokenize", &request).await
    }

    async fn decode(&self, request: DecodeRequest) -> Result<Vec<String>> {
        self.post_json("decode", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_lock;

    fn build(config: ClientConfig) -> TeiClient {
        let _env = env_lock();
        TeiClient::new(config).unwrap()
    }

    fn rank(index: usize, score: f32) -> Rank {
        Rank {
            index,
            score,
            text: None,
        }
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_prepare_sets_json_content_type() {
        let client = build(ClientConfig::new("http://localhost:8080/"));
        let request = client.prepare(Method::POST, "embed").unwrap().build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:8080/embed");
        assert_eq!(header(&request, "content-type"), Some("application/json"));
        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_prepare_headers_override_defaults() {
        let config = ClientConfig::new("http://localhost:8080")
            .with_header("Content-Type", "application/vnd.tei+json")
            .with_header("Authorization", "Bearer abc");
        let client = build(config);
        let request = client.prepare(Method::GET, "info").unwrap().build().unwrap();

        assert_eq!(request.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(header(&request, "content-type"), Some("application/vnd.tei+json"));
        assert_eq!(header(&request, "authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_prepare_last_header_wins_regardless_of_case() {
        let config = ClientConfig::new("http://localhost:8080")
            .with_header("authorization", "first")
            .with_header("Authorization", "second");
        let client = build(config);
        let request = client.prepare(Method::GET, "info").unwrap().build().unwrap();

        assert_eq!(request.headers().get_all("authorization").iter().count(), 1);
        assert_eq!(header(&request, "authorization"), Some("second"));
    }

    #[test]
    fn test_prepare_cookies() {
        let config = ClientConfig::new("http://localhost:8080")
            .with_header("Cookie", "pinned=1")
            .with_cookie("session", "abc")
            .with_cookie("route", "a");
        let client = build(config);
        let request = client.prepare(Method::GET, "health").unwrap().build().unwrap();

        assert_eq!(header(&request, "cookie"), Some("pinned=1; route=a; session=abc"));
    }

    #[test]
    fn test_prepare_cookie_value_cannot_add_cookies() {
        let config = ClientConfig::new("http://localhost:8080")
            .with_cookie("session", "abc; admin=true")
            .with_cookie("evil;x", "1");
        let client = build(config);
        let request = client.prepare(Method::GET, "health").unwrap().build().unwrap();

        assert_eq!(
            header(&request, "cookie"),
            Some("evilx=1; session=\"abc admin=true\"")
        );
    }

    #[test]
    fn test_sanitize_cookie_parts() {
        assert_eq!(sanitize_cookie_value("plain"), "plain");
        assert_eq!(sanitize_cookie_value("a\"b\\c;d"), "abcd");
        assert_eq!(sanitize_cookie_value("caf\u{e9}\tbar"), "cafbar");
        assert_eq!(sanitize_cookie_value("a,b"), "\"a,b\"");
        assert_eq!(sanitize_cookie_value("two words"), "\"two words\"");
        assert_eq!(sanitize_cookie_name("line\nbreak\r"), "line-break-");
        assert_eq!(sanitize_cookie_name("a=b;c"), "abc");
    }

    #[test]
    fn test_invalid_header_fails_at_request_time() {
        let config = ClientConfig::new("http://localhost:8080").with_header("bad header", "x");
        let client = build(config);

        assert!(matches!(
            client.prepare(Method::GET, "info"),
            Err(ClientError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_attach_texts_by_index() {
        let texts = vec!["TensorFlow".to_string(), "PyTorch".to_string()];
        let mut ranks = vec![rank(1, 0.9), rank(0, 0.1)];

        attach_texts(&mut ranks, &texts).unwrap();

        assert_eq!(ranks[0].text.as_deref(), Some("PyTorch"));
        assert_eq!(ranks[1].text.as_deref(), Some("TensorFlow"));
        assert_eq!(ranks[0].score, 0.9);
        assert_eq!(ranks[1].score, 0.1);
    }

    #[test]
    fn test_attach_texts_out_of_range() {
        let texts = vec!["only".to_string()];
        let mut ranks = vec![rank(3, 0.5)];

        let err = attach_texts(&mut ranks, &texts).unwrap_err();
        assert!(matches!(err, ClientError::ResponseDecode(_)));
    }

    #[test]
    fn test_error_from_body() {
        let err = TeiClient::error_from_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"error":"bad input","error_type":"validation"}"#,
        );
        assert!(matches!(err, ClientError::Validation(m) if m == "bad input"));

        let err = TeiClient::error_from_body(StatusCode::BAD_GATEWAY, b"<html>nginx</html>");
        assert!(matches!(err, ClientError::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_input_without_network() {
        // Nothing listens on port 1; a request would fail with a transport error.
        let client = build(ClientConfig::new("http://127.0.0.1:1"));
        let err = client.embed(EmbedRequest::new("")).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput));
    }
}
