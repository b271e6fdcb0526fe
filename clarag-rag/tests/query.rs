mod support;

use std::sync::Arc;

use clarag_core::Mode;
use clarag_rag::{
    ClaraModel, ClaraPipeline, ModelRegistry, NormalRag, QueryRequest, QueryService, SharedLlm,
    GenerationSettings, NO_DOCUMENTS_MESSAGE,
};
use support::{hash_embedder, EntryPointBehaviour, FakeEntryPoint, RecordingLlm, LANDMARKS};

fn service() -> QueryService {
    let rag_llm: SharedLlm = RecordingLlm::answering("rag answer");
    let clara_generator: SharedLlm = RecordingLlm::answering("unused");
    let entry_point =
        FakeEntryPoint::new(EntryPointBehaviour::Answer(vec!["clara answer".to_string()]));
    QueryService::new(
        NormalRag::new(Some(hash_embedder()), Some(rag_llm)),
        ClaraPipeline::new(Some(Arc::new(ClaraModel::new(entry_point, clara_generator)))),
    )
}

fn request(mode: Mode, documents: &str) -> QueryRequest {
    QueryRequest {
        mode,
        documents: documents.to_string(),
        question: "Where is the Eiffel Tower?".to_string(),
        top_k: 2,
    }
}

#[tokio::test]
async fn reports_missing_documents() {
    let service = service();
    for documents in ["", "   ", "---\n---"] {
        let markdown = service.process_query(&request(Mode::NormalRag, documents)).await;
        assert_eq!(markdown, NO_DOCUMENTS_MESSAGE);
    }
}

#[tokio::test]
async fn dispatches_on_mode() {
    let service = service();

    let rag = service.process_query(&request(Mode::NormalRag, LANDMARKS)).await;
    assert!(rag.starts_with("**Answer:**\nrag answer\n"));
    assert!(rag.contains("**Mode:** Normal RAG"));
    assert!(rag.contains("**Retrieved Documents:**"));

    let clara = service.process_query(&request(Mode::Clara, LANDMARKS)).await;
    assert!(clara.starts_with("**Answer:**\nclara answer\n"));
    assert!(clara.contains("**Mode:** CLaRa"));
    assert!(clara.contains("**Documents Passed:** 3"));
}

#[tokio::test]
async fn missing_question_is_returned_verbatim() {
    let mut req = request(Mode::Clara, LANDMARKS);
    req.question.clear();

    let markdown = service().process_query(&req).await;

    assert_eq!(markdown, "Please provide documents and a question.");
}

#[tokio::test]
async fn empty_registry_reports_unloaded_models() {
    let service =
        QueryService::from_registry(&ModelRegistry::default(), &GenerationSettings::default());

    let rag = service.process_query(&request(Mode::NormalRag, LANDMARKS)).await;
    assert_eq!(rag, "Error: Models not loaded. Please restart the app.");

    let clara = service.process_query(&request(Mode::Clara, LANDMARKS)).await;
    assert_eq!(
        clara,
        "Error: CLaRa model not loaded. Please check the model download."
    );
}

#[test]
fn request_defaults_and_lenient_mode() {
    let req: QueryRequest = serde_json::from_str(
        r#"{"documents": "a", "question": "b"}"#,
    )
    .unwrap();
    assert_eq!(req.mode, Mode::NormalRag);
    assert_eq!(req.top_k, 3);

    let req: QueryRequest = serde_json::from_str(
        r#"{"mode": "CLaRa", "documents": "a", "question": "b", "top_k": 5}"#,
    )
    .unwrap();
    assert_eq!(req.mode, Mode::Clara);
    assert_eq!(req.top_k, 5);

    let req: QueryRequest =
        serde_json::from_str(r#"{"mode": "Something else", "documents": "a", "question": "b"}"#)
            .unwrap();
    assert_eq!(req.mode, Mode::NormalRag);
}
