use async_trait::async_trait;
use clarag_core::{Embedding, EmbeddingError};

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Bag-of-words embedding that hashes each lowercased token into a bucket.
///
/// Needs no model server, so the demo can run fully offline. Texts that share
/// words land close together, which is enough to make ranking meaningful.
#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_to_vec(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0; self.dimension];
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase);
        for token in tokens {
            let bucket = fnv1a(token.as_bytes()) % self.dimension as u64;
            vec[bucket as usize] += 1.0;
        }
        vec
    }
}

#[async_trait]
impl Embedding for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.hash_to_vec(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.hash_to_vec(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
