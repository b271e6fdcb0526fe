use std::sync::Arc;

use clarag_core::{Document, Embedding};
use serde::Serialize;

use crate::{dot, normalize, top_k, RetrievalError, RetrievalResult};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoredDocument {
    pub index: usize,
    pub content: String,
    pub score: f32,
}

/// Embeds a request's documents and question, then ranks by dot product of
/// the unit-normalized vectors (cosine similarity).
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedding>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedding>) -> Self {
        Self { embedder }
    }

    pub async fn retrieve(
        &self,
        docs: &[Document],
        question: &str,
        k: usize,
    ) -> RetrievalResult<Vec<ScoredDocument>> {
        if docs.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();
        let mut doc_embeddings = self.embedder.embed_batch(&texts).await?;
        if doc_embeddings.len() != docs.len() {
            return Err(RetrievalError::BatchSize {
                expected: docs.len(),
                got: doc_embeddings.len(),
            });
        }
        let mut query = self.embedder.embed(question).await?;

        normalize(&mut query);
        let mut scores = Vec::with_capacity(doc_embeddings.len());
        for embedding in doc_embeddings.iter_mut() {
            if embedding.len() != query.len() {
                return Err(RetrievalError::DimensionMismatch {
                    expected: query.len(),
                    got: embedding.len(),
                });
            }
            normalize(embedding);
            scores.push(dot(embedding, &query));
        }

        let ranked = top_k(&scores, k);
        tracing::debug!(
            candidates = docs.len(),
            selected = ranked.len(),
            "ranked documents by similarity"
        );

        Ok(ranked
            .into_iter()
            .map(|scored| ScoredDocument {
                index: docs[scored.index].index,
                content: docs[scored.index].content.clone(),
                score: scored.score,
            })
            .collect())
    }
}
