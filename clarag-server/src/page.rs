//! The single HTML page: form on the left, rendered result on the right.

use clarag_core::Mode;
use clarag_rag::QueryRequest;
use pulldown_cmark::{html, Event, Options, Parser};

pub const TITLE: &str = "CLaRa vs Normal RAG Comparison Demo";

pub const DOCUMENTS_PLACEHOLDER: &str = "Paste your documents here, separated by '---'\n\nExample:\nDoc A text...\n---\nDoc B text...\n---\nDoc C text...";

pub const QUESTION_PLACEHOLDER: &str = "Enter your question here...";

pub const EXAMPLE_DOCUMENTS: &str = "The Eiffel Tower is a wrought-iron lattice tower on the Champ de Mars in Paris, France. It is named after the engineer Gustave Eiffel, whose company designed and built the tower from 1887 to 1889.
---
The Statue of Liberty is a neoclassical sculpture on Liberty Island in New York Harbor. It was a gift from France to the United States and was dedicated in 1886.
---
The Great Wall of China is a series of fortifications made of stone, brick, and other materials, generally built along an east-to-west line across the historical northern borders of China.";

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:1200px;margin:2rem auto;padding:0 1rem;color:#1f2937}\
.row{display:flex;gap:2rem;flex-wrap:wrap}.col{flex:1;min-width:320px}\
label{display:block;font-weight:600;margin:1rem 0 .4rem}\
textarea,input[type=text]{width:100%;box-sizing:border-box;padding:.5rem;font:inherit}\
button{margin-top:1rem;padding:.6rem 2rem;background:#f97316;color:#fff;border:0;border-radius:6px;font-weight:600;cursor:pointer}\
.result{border:1px solid #e5e7eb;border-radius:8px;padding:1rem;min-height:12rem;overflow-wrap:anywhere}\
pre{background:#f3f4f6;padding:1rem;white-space:pre-wrap}";

/// Values the form is rendered with: the last submission, or the defaults.
pub fn empty_form() -> QueryRequest {
    QueryRequest {
        mode: Mode::default(),
        documents: String::new(),
        question: String::new(),
        top_k: 3,
    }
}

/// Render the page. `result` is the markdown shown in the result panel.
pub fn render_page(form: &QueryRequest, max_top_k: usize, result: Option<&str>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>CLaRa vs Normal RAG Demo</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<h1>{TITLE}</h1>\n\
<p>This demo compares two approaches to document-based question answering:</p>\n\
<ul>\n<li><strong>CLaRa</strong>: Latent document compression (no prompt stuffing)</li>\n\
<li><strong>Normal RAG</strong>: Retrieve top-K docs &rarr; stuff into prompt &rarr; LLM answers</li>\n</ul>\n"
    ));

    out.push_str("<div class=\"row\">\n<form class=\"col\" method=\"post\" action=\"/run\">\n");
    out.push_str("<label>Mode</label>\n");
    for mode in Mode::ALL {
        let checked = if form.mode == mode { " checked" } else { "" };
        out.push_str(&format!(
            "<label style=\"display:inline;font-weight:400\"><input type=\"radio\" name=\"mode\" value=\"{label}\"{checked}> {label}</label>\n",
            label = mode.label()
        ));
    }

    out.push_str(&format!(
        "<label for=\"top_k\">Top K (for RAG mode): <output id=\"top_k_value\">{top_k}</output></label>\n\
<input type=\"range\" id=\"top_k\" name=\"top_k\" min=\"1\" max=\"{max_top_k}\" step=\"1\" value=\"{top_k}\" \
oninput=\"document.getElementById('top_k_value').value=this.value\">\n\
<label for=\"documents\">Documents</label>\n\
<textarea id=\"documents\" name=\"documents\" rows=\"10\" placeholder=\"{placeholder}\">{documents}</textarea>\n\
<label for=\"question\">Question</label>\n\
<input type=\"text\" id=\"question\" name=\"question\" placeholder=\"{question_placeholder}\" value=\"{question}\">\n\
<button type=\"submit\">Run</button>\n</form>\n",
        top_k = form.top_k,
        placeholder = escape_html(DOCUMENTS_PLACEHOLDER),
        documents = escape_html(&form.documents),
        question_placeholder = escape_html(QUESTION_PLACEHOLDER),
        question = escape_html(&form.question),
    ));

    out.push_str("<div class=\"col\">\n<label>Result</label>\n<div class=\"result\">\n");
    if let Some(markdown) = result {
        out.push_str(&markdown_to_html(markdown));
    }
    out.push_str("</div>\n</div>\n</div>\n");

    out.push_str(&format!(
        "<h3>How to use:</h3>\n<ol>\n\
<li>Paste your documents in the textarea, separated by <code>---</code></li>\n\
<li>Enter your question</li>\n\
<li>Choose the mode (Normal RAG or CLaRa)</li>\n\
<li>For RAG mode, adjust Top-K slider</li>\n\
<li>Click \"Run\"</li>\n</ol>\n\
<h3>Example Documents:</h3>\n<pre><code>{}</code></pre>\n</body>\n</html>\n",
        escape_html(EXAMPLE_DOCUMENTS)
    ));
    out
}

/// Markdown to HTML. Raw HTML in the input is shown as text, since answers
/// and document snippets come straight from user input and model output.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
