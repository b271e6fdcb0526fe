use std::collections::HashMap;

use clarag_core::{ClaragError, Value};

use crate::PromptTemplate;

/// Grounded-answer prompt used by the RAG pipeline.
pub const RAG_PROMPT: &str = "Answer ONLY using the provided context. If the answer is not in the context, say \"I don't know.\"

[CONTEXT]
{{context}}

[QUESTION]
{{question}}

[ANSWER]
";

const CLARA_FALLBACK_PROMPT: &str = "Question: {{question}}\n\nDocuments:\n{{documents}}";

/// `Doc1: ...`, `Doc2: ...` separated by blank lines, numbered by rank.
pub fn build_context<S: AsRef<str>>(docs: &[S]) -> String {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| format!("Doc{}: {}", i + 1, doc.as_ref()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn rag_prompt(context: &str, question: &str) -> Result<String, ClaragError> {
    let mut vars = HashMap::new();
    vars.insert("context".to_string(), Value::from(context));
    vars.insert("question".to_string(), Value::from(question));
    PromptTemplate::new(RAG_PROMPT).render(&vars)
}

/// Plain prompt for CLaRa backends that lack the `generate_from_text` call.
pub fn clara_fallback_prompt<S: AsRef<str>>(
    question: &str,
    docs: &[S],
) -> Result<String, ClaragError> {
    let documents = docs
        .iter()
        .map(|doc| doc.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut vars = HashMap::new();
    vars.insert("question".to_string(), Value::from(question));
    vars.insert("documents".to_string(), Value::from(documents));
    PromptTemplate::new(CLARA_FALLBACK_PROMPT).render(&vars)
}
