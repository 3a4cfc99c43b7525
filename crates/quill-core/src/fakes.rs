//! In-memory backend fake (testing only)
//!
//! [`ScriptedBackend`] answers each prompt from a list of substring rules,
//! falling back to a default reply. Replies can be delayed to simulate slow
//! or out-of-order completion, and every prompt is recorded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{GenerationRequest, GenerationResult, GenerativeBackend};
use crate::error::BackendFailure;

/// What the fake does for a matching prompt.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(BackendFailure),
    /// Sleep on the tokio clock, then behave like the inner reply.
    Delayed(Duration, Box<Reply>),
    /// Panic inside `generate`.
    Panic(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn fail(failure: BackendFailure) -> Self {
        Reply::Fail(failure)
    }

    pub fn after(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }
}

#[derive(Debug)]
pub struct ScriptedBackend {
    rules: Vec<(String, Reply)>,
    default: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn with_default(default: Reply) -> Self {
        Self {
            rules: Vec::new(),
            default,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` to prompts containing `needle`. Earlier rules win.
    pub fn when(mut self, needle: impl Into<String>, reply: Reply) -> Self {
        self.rules.push((needle.into(), reply));
        self
    }

    /// Convenience rule keyed on the `Craft dimension:` line of critique prompts.
    pub fn when_dimension(self, dimension: &str, reply: Reply) -> Self {
        self.when(format!("Craft dimension: {dimension}\n"), reply)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reply_for(&self, prompt: &str) -> Reply {
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.prompt.clone());

        let mut reply = self.reply_for(&request.prompt);
        loop {
            match reply {
                Reply::Text(text) => return Ok(text),
                Reply::Fail(failure) => return Err(failure),
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
                Reply::Panic(message) => panic!("{message}"),
            }
        }
    }
}
