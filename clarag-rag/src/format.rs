//! Markdown rendering of a pipeline result for the result panel.

use clarag_core::{format_seconds, ClaraEvidence, Evidence, RagEvidence, RunOutcome};

/// Characters of each retrieved document shown in the evidence block.
pub const SNIPPET_CHARS: usize = 200;

/// Answer plus evidence block. With no evidence the answer is returned as is.
pub fn format_output(answer: &str, evidence: Option<&Evidence>) -> String {
    let Some(evidence) = evidence else {
        return answer.to_string();
    };

    let mut output = format!("**Answer:**\n{answer}\n\n");
    output.push_str("---\n\n");
    output.push_str(&format!("**Mode:** {}\n\n", evidence.mode()));
    output.push_str(&format!("**Explanation:**\n{}\n\n", evidence.explanation()));

    match evidence {
        Evidence::Rag(rag) => write_rag(&mut output, rag),
        Evidence::Clara(clara) => write_clara(&mut output, clara),
    }

    output.push_str(&format!(
        "\n**Total Time:** {}\n",
        format_seconds(evidence.total_time())
    ));
    output
}

pub fn format_outcome(outcome: &RunOutcome) -> String {
    format_output(&outcome.answer, outcome.evidence.as_ref())
}

fn write_rag(output: &mut String, rag: &RagEvidence) {
    output.push_str("**Retrieved Documents:**\n");
    for (i, (doc, score)) in rag.selected_docs.iter().zip(rag.scores.iter()).enumerate() {
        output.push_str(&format!(
            "\n**Doc {}** (similarity: {:.4}):\n{}...\n",
            i + 1,
            score,
            snippet(doc)
        ));
    }
    output.push_str(&format!(
        "\n**Prompt Length:** {} characters\n",
        group_thousands(rag.prompt_length)
    ));
    output.push_str(&format!(
        "**Retrieval Time:** {}\n",
        format_seconds(rag.retrieval_time)
    ));
    output.push_str(&format!(
        "**Generation Time:** {}\n",
        format_seconds(rag.generation_time)
    ));
}

fn write_clara(output: &mut String, clara: &ClaraEvidence) {
    output.push_str(&format!("**Documents Passed:** {}\n", clara.docs_passed));
    output.push_str(&format!(
        "**Generation Time:** {}\n",
        format_seconds(clara.generation_time)
    ));
}

fn snippet(doc: &str) -> &str {
    match doc.char_indices().nth(SNIPPET_CHARS) {
        Some((byte, _)) => &doc[..byte],
        None => doc,
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
