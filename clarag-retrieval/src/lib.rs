mod error;
mod rank;
mod retriever;

pub use error::{RetrievalError, RetrievalResult};
pub use rank::{dot, normalize, top_k, ScoredIndex};
pub use retriever::{Retriever, ScoredDocument};
