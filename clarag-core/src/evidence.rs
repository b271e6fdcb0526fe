use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

/// Which question-answering strategy handles a request.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum Mode {
    #[default]
    #[serde(rename = "Normal RAG")]
    NormalRag,
    #[serde(rename = "CLaRa")]
    Clara,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::NormalRag, Mode::Clara];

    pub fn label(self) -> &'static str {
        match self {
            Mode::NormalRag => "Normal RAG",
            Mode::Clara => "CLaRa",
        }
    }

    /// Anything other than `"CLaRa"` runs the RAG pipeline.
    pub fn from_label(label: &str) -> Self {
        if label.trim() == Mode::Clara.label() {
            Mode::Clara
        } else {
            Mode::NormalRag
        }
    }
}

impl From<String> for Mode {
    fn from(label: String) -> Self {
        Mode::from_label(&label)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seconds with millisecond precision, e.g. `0.123s`.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_seconds(*duration))
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RagEvidence {
    pub top_k: usize,
    pub explanation: String,
    pub selected_docs: Vec<String>,
    pub scores: Vec<f32>,
    pub indices: Vec<usize>,
    /// Prompt length in characters.
    pub prompt_length: usize,
    #[serde(serialize_with = "serialize_seconds")]
    pub retrieval_time: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub generation_time: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub total_time: Duration,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClaraEvidence {
    pub explanation: String,
    pub docs_passed: usize,
    /// False when the answer came from the plain-prompt fallback.
    pub native_entry_point: bool,
    #[serde(serialize_with = "serialize_seconds")]
    pub generation_time: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub total_time: Duration,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "mode")]
pub enum Evidence {
    #[serde(rename = "Normal RAG")]
    Rag(RagEvidence),
    #[serde(rename = "CLaRa")]
    Clara(ClaraEvidence),
}

impl Evidence {
    pub fn mode(&self) -> Mode {
        match self {
            Evidence::Rag(_) => Mode::NormalRag,
            Evidence::Clara(_) => Mode::Clara,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Evidence::Rag(evidence) => &evidence.explanation,
            Evidence::Clara(evidence) => &evidence.explanation,
        }
    }

    pub fn total_time(&self) -> Duration {
        match self {
            Evidence::Rag(evidence) => evidence.total_time,
            Evidence::Clara(evidence) => evidence.total_time,
        }
    }
}

/// What a pipeline hands back: the answer text and, after a successful run,
/// the evidence describing how it was produced.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RunOutcome {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl RunOutcome {
    pub fn answered(answer: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            answer: answer.into(),
            evidence: Some(evidence),
        }
    }

    /// A user-facing message with no evidence attached.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            answer: message.into(),
            evidence: None,
        }
    }
}
