use std::time::Duration;

use clarag_core::{format_seconds, ClaraEvidence, Evidence, Mode, RunOutcome};

#[test]
fn mode_labels_match_ui_choices() {
    assert_eq!(Mode::NormalRag.label(), "Normal RAG");
    assert_eq!(Mode::Clara.to_string(), "CLaRa");
    assert_eq!(Mode::from_label("CLaRa"), Mode::Clara);
    assert_eq!(Mode::from_label("Normal RAG"), Mode::NormalRag);
    assert_eq!(Mode::from_label("something else"), Mode::NormalRag);
}

#[test]
fn seconds_are_formatted_with_three_decimals() {
    assert_eq!(format_seconds(Duration::from_millis(123)), "0.123s");
    assert_eq!(format_seconds(Duration::from_micros(1_456_400)), "1.456s");
}

#[test]
fn evidence_serializes_with_mode_tag_and_string_timings() {
    let outcome = RunOutcome::answered(
        "Paris",
        Evidence::Clara(ClaraEvidence {
            explanation: "We passed 3 docs directly to CLaRa.".to_string(),
            docs_passed: 3,
            native_entry_point: true,
            generation_time: Duration::from_millis(2345),
            total_time: Duration::from_millis(2345),
        }),
    );

    let value = serde_json::to_value(&outcome).expect("serialize outcome");
    assert_eq!(value["answer"], "Paris");
    assert_eq!(value["evidence"]["mode"], "CLaRa");
    assert_eq!(value["evidence"]["docs_passed"], 3);
    assert_eq!(value["evidence"]["generation_time"], "2.345s");
}

#[test]
fn message_outcome_has_no_evidence() {
    let outcome = RunOutcome::message("Please provide documents and a question.");
    let value = serde_json::to_value(&outcome).expect("serialize outcome");
    assert!(value.get("evidence").is_none());
}

#[test]
fn mode_deserializes_leniently() {
    let clara: Mode = serde_json::from_str("\"CLaRa\"").unwrap();
    let other: Mode = serde_json::from_str("\"bm25\"").unwrap();
    assert_eq!(clara, Mode::Clara);
    assert_eq!(other, Mode::NormalRag);
    assert_eq!(serde_json::to_string(&Mode::NormalRag).unwrap(), "\"Normal RAG\"");
}
