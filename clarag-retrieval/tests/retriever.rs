use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use clarag_core::{parse_documents, Embedding, EmbeddingError};
use clarag_embeddings::HashEmbedder;
use clarag_retrieval::{RetrievalError, Retriever};

/// Looks texts up in a fixed table.
struct TableEmbedder(HashMap<String, Vec<f32>>);

#[async_trait]
impl Embedding for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.0
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::Provider(format!("unknown text {text}")))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::new();
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        2
    }
}

fn table(entries: &[(&str, [f32; 2])]) -> Arc<TableEmbedder> {
    Arc::new(TableEmbedder(
        entries
            .iter()
            .map(|(text, v)| (text.to_string(), v.to_vec()))
            .collect(),
    ))
}

#[tokio::test]
async fn ranks_by_cosine_after_normalizing() {
    let embedder = table(&[
        ("a", [10.0, 0.0]),
        ("b", [0.0, 1.0]),
        ("c", [1.0, 1.0]),
        ("q", [2.0, 0.0]),
    ]);
    let retriever = Retriever::new(embedder);
    let docs = parse_documents("a\n---\nb\n---\nc");

    let results = retriever.retrieve(&docs, "q", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].content, "a");
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert_eq!(results[1].content, "c");
    assert_eq!(results[1].index, 2);
}

#[tokio::test]
async fn embedding_failure_propagates() {
    let retriever = Retriever::new(table(&[("a", [1.0, 0.0])]));
    let docs = parse_documents("a");
    let err = retriever.retrieve(&docs, "unknown", 1).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Embedding(_)));
}

#[tokio::test]
async fn nothing_to_rank_short_circuits() {
    let retriever = Retriever::new(table(&[]));
    assert!(retriever.retrieve(&[], "q", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn hash_embedder_prefers_overlapping_words() {
    let retriever = Retriever::new(Arc::new(HashEmbedder::new(256)));
    let docs = parse_documents(
        "The Eiffel Tower is in Paris.\n---\nThe Great Wall of China is long.\n---\nLiberty Island is in New York Harbor.",
    );
    let results = retriever
        .retrieve(&docs, "Where is the Eiffel Tower?", 1)
        .await
        .unwrap();
    assert_eq!(results[0].index, 0);
}
