//! Scripted `CompletionService` test double.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionOptions, CompletionService, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Returns scripted responses in order and records every call it receives.
///
/// Responses are matched by a marker substring of the user prompt when one
/// is given, so concurrent calls resolve deterministically.
#[derive(Default)]
pub struct MockCompletion {
    routed: Mutex<Vec<(String, Result<String, LlmError>)>>,
    queued: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responds with `response` to the first call whose user prompt contains `marker`.
    pub fn on(self, marker: &str, response: &str) -> Self {
        self.routed
            .lock()
            .unwrap()
            .push((marker.to_string(), Ok(response.to_string())));
        self
    }

    pub fn on_error(self, marker: &str, err: LlmError) -> Self {
        self.routed.lock().unwrap().push((marker.to_string(), Err(err)));
        self
    }

    /// Queues a response for any call not matched by a marker.
    pub fn then(self, response: &str) -> Self {
        self.queued.lock().unwrap().push_back(Ok(response.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens: options.max_tokens,
        });

        let mut routed = self.routed.lock().unwrap();
        if let Some(pos) = routed.iter().position(|(marker, _)| user.contains(marker.as_str())) {
            return routed.remove(pos).1;
        }
        drop(routed);

        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
