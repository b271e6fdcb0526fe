use clarag_core::{parse_documents, Evidence, Mode};
use clarag_rag::{
    ClaraConfig, EmbedderConfig, EmbedderProvider, GenerationSettings, LlmConfig, ModelRegistry,
    ModelsConfig, QueryRequest, QueryService, RagError,
};
use httpmock::prelude::*;
use serde_json::json;

fn hash_embedder() -> EmbedderConfig {
    EmbedderConfig {
        provider: EmbedderProvider::Hash,
        dimension: 128,
        ..EmbedderConfig::default()
    }
}

fn ollama(server: &MockServer, model: &str) -> LlmConfig {
    LlmConfig {
        base_url: server.url(""),
        ..LlmConfig::ollama(model)
    }
}

#[test]
fn defaults_match_the_demo_models() {
    let config = ModelsConfig::default();
    assert_eq!(config.rag_llm.model, "qwen2.5:3b-instruct");
    assert_eq!(config.rag_fallback_llm.unwrap().model, "phi3:mini");
    assert_eq!(config.clara.unwrap().model, "apple/CLaRa-7B-Instruct");
    assert!(config.probe);
    assert_eq!(config.timeout_secs, 120);

    let settings = GenerationSettings::default();
    assert_eq!(settings.rag_options().context_window, Some(2048));
    assert_eq!(settings.clara_options().context_window, Some(4096));
    assert_eq!(settings.rag_options().max_new_tokens, 256);
}

#[test]
fn providers_deserialize_in_kebab_case() {
    let config: ModelsConfig = serde_json::from_value(json!({
        "embedder": {"provider": "openai-compatible", "base_url": "http://emb", "model": "e5", "dimension": 0},
        "rag_llm": {"provider": "ollama", "base_url": "http://ollama", "model": "qwen"},
        "clara": null,
        "probe": false
    }))
    .unwrap();

    assert_eq!(config.embedder.provider, EmbedderProvider::OpenaiCompatible);
    assert_eq!(config.embedder.dimension, 0);
    assert!(config.clara.is_none());
    assert_eq!(config.rag_fallback_llm.unwrap().model, "phi3:mini");
}

#[tokio::test]
async fn loads_without_probing_backends() {
    let config = ModelsConfig {
        embedder: hash_embedder(),
        probe: false,
        ..ModelsConfig::default()
    };

    let registry = ModelRegistry::load(&config).await.unwrap();
    let status = registry.status();

    assert!(status.embedder);
    assert_eq!(status.rag_llm.as_deref(), Some("qwen2.5:3b-instruct"));
    assert!(status.clara);
}

#[tokio::test]
async fn zero_dimension_hash_embedder_is_fatal() {
    let config = ModelsConfig {
        embedder: EmbedderConfig {
            dimension: 0,
            ..hash_embedder()
        },
        probe: false,
        ..ModelsConfig::default()
    };

    let result = ModelRegistry::load(&config).await;
    assert!(matches!(result, Err(RagError::Load { .. })));
}

#[tokio::test]
async fn falls_back_to_the_smaller_model_when_the_primary_fails() {
    let server = MockServer::start();
    let primary = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model":"big"}"#);
        then.status(500).body("model not found");
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model":"small"}"#);
        then.status(200)
            .json_body(json!({"message": {"role": "assistant", "content": "It is in Paris."}}));
    });

    let config = ModelsConfig {
        embedder: hash_embedder(),
        rag_llm: ollama(&server, "big"),
        rag_fallback_llm: Some(ollama(&server, "small")),
        clara: None,
        ..ModelsConfig::default()
    };

    let registry = ModelRegistry::load(&config).await.unwrap();
    primary.assert();
    assert_eq!(registry.status().rag_llm.as_deref(), Some("small"));
    assert!(!registry.status().clara);

    let service = QueryService::from_registry(&registry, &GenerationSettings::default());
    let outcome = service
        .run(&QueryRequest {
            mode: Mode::NormalRag,
            documents: "The Eiffel Tower is in Paris.\n---\nThe Great Wall is in China.".to_string(),
            question: "Where is the Eiffel Tower?".to_string(),
            top_k: 1,
        })
        .await;
    assert_eq!(outcome.answer, "It is in Paris.");
    assert!(matches!(outcome.evidence, Some(Evidence::Rag(_))));
}

#[tokio::test]
async fn clara_without_entry_point_uses_plain_generation() {
    let server = MockServer::start();
    let entry_point = server.mock(|when, then| {
        when.method(POST).path("/clara/generate_from_text");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model":"clara"}"#);
        then.status(200)
            .json_body(json!({"message": {"role": "assistant", "content": "Paris"}}));
    });

    let config = ModelsConfig {
        embedder: hash_embedder(),
        rag_llm: ollama(&server, "clara"),
        rag_fallback_llm: None,
        clara: Some(ClaraConfig {
            base_url: server.url("/clara"),
            model: "clara".to_string(),
            generation: Some(ollama(&server, "clara")),
        }),
        ..ModelsConfig::default()
    };

    let registry = ModelRegistry::load(&config).await.unwrap();
    let clara = registry.clara().expect("clara loaded");
    assert!(!clara.has_entry_point());

    let service = QueryService::from_registry(&registry, &GenerationSettings::default());
    let outcome = service
        .run(&QueryRequest {
            mode: Mode::Clara,
            documents: "The Eiffel Tower is in Paris.".to_string(),
            question: "Where?".to_string(),
            top_k: 3,
        })
        .await;

    assert_eq!(outcome.answer, "Paris");
    let Some(Evidence::Clara(evidence)) = outcome.evidence else {
        panic!("expected CLaRa evidence");
    };
    assert!(!evidence.native_entry_point);
    assert_eq!(evidence.docs_passed, parse_documents("The Eiffel Tower is in Paris.").len());
    entry_point.assert_hits(1);
}

#[tokio::test]
async fn unreachable_clara_leaves_the_slot_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/generate_from_text");
        then.status(500).body("boom");
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200)
            .json_body(json!({"message": {"role": "assistant", "content": "pong"}}));
    });

    let config = ModelsConfig {
        embedder: hash_embedder(),
        rag_llm: ollama(&server, "qwen"),
        clara: Some(ClaraConfig {
            base_url: server.url(""),
            ..ClaraConfig::default()
        }),
        ..ModelsConfig::default()
    };

    let registry = ModelRegistry::load(&config).await.unwrap();
    assert!(registry.clara().is_none());
    assert_eq!(registry.status().rag_llm.as_deref(), Some("qwen"));
}

#[tokio::test]
async fn clara_startup_check_sends_a_document() {
    let server = MockServer::start();
    let entry_point = server.mock(|when, then| {
        when.method(POST)
            .path("/generate_from_text")
            .json_body_partial(r#"{"documents":[["ping"]]}"#);
        then.status(200).json_body(json!(["pong"]));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(500).body("generator should not be needed");
    });

    let config = ModelsConfig {
        embedder: hash_embedder(),
        rag_llm: ollama(&server, "qwen"),
        rag_fallback_llm: None,
        clara: Some(ClaraConfig {
            base_url: server.url(""),
            model: "clara".to_string(),
            generation: Some(ollama(&server, "clara")),
        }),
        ..ModelsConfig::default()
    };

    let registry = ModelRegistry::load(&config).await.unwrap();
    entry_point.assert();
    let clara = registry.clara().expect("clara loaded");
    assert!(clara.has_entry_point());
}

#[test]
fn partial_model_blocks_fill_in_defaults() {
    let config: ModelsConfig = serde_json::from_value(json!({
        "embedder": {"model": "nomic-embed-text", "dimension": 768},
        "rag_llm": {"model": "llama3.2"},
        "clara": {"model": "my/clara"}
    }))
    .unwrap();

    assert_eq!(config.embedder.provider, EmbedderProvider::Ollama);
    assert_eq!(config.embedder.base_url, "http://localhost:11434");
    assert_eq!(config.rag_llm, LlmConfig::ollama("llama3.2"));
    let clara = config.clara.unwrap();
    assert_eq!(clara.base_url, "http://localhost:8000");
    assert_eq!(clara.model, "my/clara");
}
