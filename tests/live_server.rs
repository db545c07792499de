//! Smoke test against a running server. Run with
//! `TEI_HOST=http://localhost:8080 cargo test -- --ignored`.

use tei_client::{
    ClientConfig, DecodeRequest, EmbedRequest, EmbeddingService, TeiClient, TokenizeRequest,
};

fn client() -> TeiClient {
    let config = ClientConfig::from_env().expect("valid TEI_* environment");
    TeiClient::new(config).expect("client builds")
}

#[tokio::test]
#[ignore = "needs a running inference server at TEI_HOST"]
async fn test_live_embed_and_info() {
    let client = client();

    assert!(client.health().await.unwrap());

    let embeddings = client.embed(EmbedRequest::new("Hello world!")).await.unwrap();
    assert_eq!(embeddings.len(), 1);
    assert!(!embeddings[0].is_empty());

    let info = client.info().await.unwrap();
    assert!(!info.model_id.is_empty());
    println!("{}", serde_json::to_string_pretty(&info).unwrap());
}

#[tokio::test]
#[ignore = "needs a running inference server at TEI_HOST"]
async fn test_live_tokenize_decode_round_trip() {
    let client = client();

    let tokens = client
        .tokenize(TokenizeRequest::new(vec!["Hello world!".to_string()]))
        .await
        .unwrap();
    let ids = tokens[0].iter().map(|t| t.id).collect::<Vec<_>>();

    let texts = client.decode(DecodeRequest::new(vec![ids])).await.unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(
        texts[0].trim().to_lowercase(),
        "hello world!".to_string()
    );
}
