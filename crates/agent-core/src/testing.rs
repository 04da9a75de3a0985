//! Scripted provider for tests
//!
//! Replays queued replies and classification labels in order and records
//! every transport call, so tests can assert how many round-trips a turn
//! made and what was sent.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::provider::{
    ContextEntry, GenerationOptions, LlmProvider, ModelContext, ModelReply, ProviderInfo,
};

/// A call observed by [`ScriptedProvider`]
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    Classify {
        system_prompt: String,
        text: String,
    },
    Generate {
        system_prompt: String,
        tools: Vec<String>,
        entries: Vec<ContextEntry>,
    },
}

#[derive(Default)]
struct Script {
    labels: VecDeque<Result<String>>,
    replies: VecDeque<Result<ModelReply>>,
    calls: Vec<RecordedCall>,
}

/// Provider that answers from a queue
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a classification label
    #[must_use]
    pub fn with_classification(self, label: impl Into<String>) -> Self {
        self.lock().labels.push_back(Ok(label.into()));
        self
    }

    /// Queue a classification failure
    #[must_use]
    pub fn with_classification_error(self, error: AgentError) -> Self {
        self.lock().labels.push_back(Err(error));
        self
    }

    /// Queue a model reply
    #[must_use]
    pub fn with_reply(self, reply: ModelReply) -> Self {
        self.lock().replies.push_back(Ok(reply));
        self
    }

    /// Queue a transport failure for the next `generate`
    #[must_use]
    pub fn with_error(self, error: AgentError) -> Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Scripted".into(),
            model: "scripted".into(),
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn generate(&self, context: &ModelContext) -> Result<ModelReply> {
        let mut script = self.lock();
        script.calls.push(RecordedCall::Generate {
            system_prompt: context.system_prompt().to_string(),
            tools: context.tools().iter().map(|t| t.name.clone()).collect(),
            entries: context.entries().to_vec(),
        });
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Provider("no scripted reply left".into())))
    }

    async fn classify(
        &self,
        system_prompt: &str,
        text: &str,
        _options: &GenerationOptions,
    ) -> Result<String> {
        let mut script = self.lock();
        script.calls.push(RecordedCall::Classify {
            system_prompt: system_prompt.to_string(),
            text: text.to_string(),
        });
        script
            .labels
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Provider("no scripted label left".into())))
    }
}
