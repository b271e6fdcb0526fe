#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clarag_core::{ClaragError, Embedding, LlmRequest, LlmResponse, Runnable};
use clarag_embeddings::HashEmbedder;
use clarag_llm::GenerateFromTextRequest;

/// Answers with a fixed string and records every request.
#[derive(Default)]
pub struct RecordingLlm {
    pub answer: String,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl RecordingLlm {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|req| req.messages[0].content.clone())
            .collect()
    }
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for RecordingLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ClaragError> {
        self.requests.lock().unwrap().push(input);
        Ok(LlmResponse {
            content: self.answer.clone(),
        })
    }
}

pub struct FailingLlm;

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for FailingLlm {
    async fn invoke(&self, _input: LlmRequest) -> Result<LlmResponse, ClaragError> {
        Err(ClaragError::LlmProvider("connection refused".to_string()))
    }
}

pub enum EntryPointBehaviour {
    Answer(Vec<String>),
    Unavailable,
    Fail,
}

pub struct FakeEntryPoint {
    pub behaviour: EntryPointBehaviour,
    pub requests: Mutex<Vec<GenerateFromTextRequest>>,
}

impl FakeEntryPoint {
    pub fn new(behaviour: EntryPointBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Runnable<GenerateFromTextRequest, Vec<String>> for FakeEntryPoint {
    async fn invoke(&self, input: GenerateFromTextRequest) -> Result<Vec<String>, ClaragError> {
        self.requests.lock().unwrap().push(input);
        match &self.behaviour {
            EntryPointBehaviour::Answer(answers) => Ok(answers.clone()),
            EntryPointBehaviour::Unavailable => {
                Err(ClaragError::EntryPointUnavailable("404 Not Found".to_string()))
            }
            EntryPointBehaviour::Fail => {
                Err(ClaragError::LlmProvider("CUDA out of memory".to_string()))
            }
        }
    }
}

pub fn hash_embedder() -> Arc<dyn Embedding> {
    Arc::new(HashEmbedder::new(256))
}

pub const LANDMARKS: &str = "The Eiffel Tower is a wrought-iron lattice tower on the Champ de Mars in Paris, France. It is named after the engineer Gustave Eiffel.
---
The Statue of Liberty is a neoclassical sculpture on Liberty Island in New York Harbor. It was a gift from France to the United States.
---
The Great Wall of China is a series of fortifications made of stone, brick, and other materials.";
