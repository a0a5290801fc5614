//! Mock provider implementation for local development and tests.

use super::{InferenceProvider, ProviderError, RunOptions};
use crate::models::PromptPayload;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// One recorded `run` invocation.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub model: String,
    pub input: PromptPayload,
    pub options: RunOptions,
}

enum MockBehavior {
    Respond(serde_json::Value),
    Fail(fn() -> ProviderError),
}

/// Mock inference provider. Returns a canned result (or a canned failure)
/// and remembers every call it receives.
pub struct MockInferenceProvider {
    behavior: MockBehavior,
    calls: Mutex<Vec<RecordedRun>>,
}

impl MockInferenceProvider {
    pub fn new(response: serde_json::Value) -> Self {
        Self {
            behavior: MockBehavior::Respond(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with the error built by `error`.
    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedRun> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for MockInferenceProvider {
    fn default() -> Self {
        Self::new(json!({"response": "Mock response"}))
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn run(
        &self,
        model: &str,
        input: &PromptPayload,
        options: &RunOptions,
    ) -> Result<serde_json::Value, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedRun {
                model: model.to_string(),
                input: input.clone(),
                options: options.clone(),
            });
        }

        match &self.behavior {
            MockBehavior::Respond(value) => Ok(value.clone()),
            MockBehavior::Fail(error) => Err(error()),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Respond(_) => Ok(()),
            MockBehavior::Fail(error) => Err(error()),
        }
    }
}
