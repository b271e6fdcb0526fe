use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clarag_core::{Embedding, EmbeddingError};
use clarag_embeddings::OpenAiCompatibleEmbedding;

#[tokio::test]
async fn batch_is_reordered_by_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiCompatibleEmbedding::new(format!("{}/v1", server.uri()), "e5", 2)
        .with_api_key("sk-test");
    let out = embedder
        .embed_batch(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();
    assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn count_mismatch_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [1.0]}]
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiCompatibleEmbedding::new(server.uri(), "e5", 1);
    let err = embedder
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn empty_batch_skips_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let embedder = OpenAiCompatibleEmbedding::new(server.uri(), "e5", 1);
    assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn single_embed_uses_batch_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.25, 0.75]}]
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiCompatibleEmbedding::new(server.uri(), "e5", 2);
    assert_eq!(embedder.embed("q").await.unwrap(), vec![0.25, 0.75]);
}

#[tokio::test]
async fn stalled_server_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"index": 0, "embedding": [1.0]}]}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let timeout = std::time::Duration::from_millis(50);
    let embedder = OpenAiCompatibleEmbedding::new(format!("{}/v1", server.uri()), "e5", 1)
        .with_timeout(timeout);
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Timeout(t) if t == timeout));
}
