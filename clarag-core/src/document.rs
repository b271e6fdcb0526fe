use serde::{Deserialize, Serialize};

/// Literal separator between pasted documents.
pub const DOCUMENT_DELIMITER: &str = "---";

/// One pasted document. `index` is its position among the surviving
/// (non-empty) segments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub index: usize,
    pub content: String,
}

impl Document {
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Split pasted text on `---`, trim every segment and drop the empty ones.
pub fn parse_documents(raw: &str) -> Vec<Document> {
    raw.split(DOCUMENT_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| Document::new(index, segment))
        .collect()
}
