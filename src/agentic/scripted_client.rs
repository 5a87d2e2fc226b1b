//! Scripted Client
//!
//! Deterministic [`TextCompleter`] used to drive the router without a network
//! backend. Replies are chosen per [`PromptKind`]:
//!
//! 1. the next queued reply for that kind (FIFO), else
//! 2. the first rule whose needle occurs in the prompt, else
//! 3. the kind's fallback reply.
//!
//! A kind with nothing scripted fails with [`CompletionError::Api`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::llm_client::TextCompleter;
use super::prompts::PromptKind;
use crate::error::CompletionError;

const PROVIDER: &str = "Scripted";

#[derive(Debug, Clone)]
enum Step {
    Reply(String),
    Fail(String),
}

/// Canned-response completer keyed by prompt kind
#[derive(Debug, Default)]
pub struct ScriptedCompleter {
    queued: Mutex<HashMap<PromptKind, VecDeque<Step>>>,
    rules: Vec<(PromptKind, String, Step)>,
    fallbacks: HashMap<PromptKind, Step>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot reply for the next prompt of `kind`
    pub fn reply(mut self, kind: PromptKind, text: impl Into<String>) -> Self {
        self.queue(kind, Step::Reply(text.into()));
        self
    }

    /// Queue a one-shot failure for the next prompt of `kind`
    pub fn fail(mut self, kind: PromptKind, message: impl Into<String>) -> Self {
        self.queue(kind, Step::Fail(message.into()));
        self
    }

    /// Reply with `text` whenever a prompt of `kind` contains `needle`
    pub fn when(mut self, kind: PromptKind, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules
            .push((kind, needle.into(), Step::Reply(text.into())));
        self
    }

    /// Reply used for `kind` when nothing queued or matched
    pub fn otherwise(mut self, kind: PromptKind, text: impl Into<String>) -> Self {
        self.fallbacks.insert(kind, Step::Reply(text.into()));
        self
    }

    /// Fail every otherwise-unscripted prompt of `kind`
    pub fn otherwise_fail(mut self, kind: PromptKind, message: impl Into<String>) -> Self {
        self.fallbacks.insert(kind, Step::Fail(message.into()));
        self
    }

    /// Every prompt received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of prompts of `kind` received so far
    pub fn call_count(&self, kind: PromptKind) -> usize {
        self.calls()
            .iter()
            .filter(|prompt| PromptKind::detect(prompt) == Some(kind))
            .count()
    }

    fn queue(&mut self, kind: PromptKind, step: Step) {
        self.queued
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push_back(step);
    }

    fn next_step(&self, kind: PromptKind, prompt: &str) -> Option<Step> {
        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&kind)
            .and_then(VecDeque::pop_front);

        queued
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|(k, needle, _)| *k == kind && prompt.contains(needle.as_str()))
                    .map(|(_, _, step)| step.clone())
            })
            .or_else(|| self.fallbacks.get(&kind).cloned())
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let step = PromptKind::detect(prompt).and_then(|kind| self.next_step(kind, prompt));
        match step {
            Some(Step::Reply(text)) => Ok(text.trim().to_string()),
            Some(Step::Fail(message)) => Err(CompletionError::Api {
                provider: PROVIDER.to_string(),
                status: 503,
                body: message,
            }),
            None => Err(CompletionError::Api {
                provider: PROVIDER.to_string(),
                status: 404,
                body: format!("no scripted reply for {:?}", PromptKind::detect(prompt)),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
