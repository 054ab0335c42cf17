//! Mock LLM client for testing the translation engine and its callers
//! without a real Ollama/OpenAI endpoint.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<<~(\d+)~>>").unwrap());

/// One recorded `complete` call, for test assertions on prompts actually
/// sent.
#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    pub system: Option<String>,
    pub prompt: String,
}

/// Echoes every `<<~i~>> text` marker back unchanged (or transformed, if
/// `with_transform` was used), so callers get a deterministic,
/// count-preserving response without a real provider. Supports one-shot
/// error injection like `MockTorrentClient`.
pub struct MockLlmClient {
    provider: String,
    model: String,
    calls: Arc<RwLock<Vec<RecordedCompletion>>>,
    next_error: Arc<RwLock<Option<String>>>,
    transform: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            provider: "mock".to_string(),
            model: "mock-model".to_string(),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            transform: Arc::new(|text| text.to_string()),
        }
    }

    /// Build a mock that reports `provider` from `provider()`, so engine
    /// auto-tuning (`EngineConfig::tuning_for`) picks the branch under
    /// test.
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Self::new()
        }
    }

    /// Every echoed translation passes through `f` first, e.g. to
    /// simulate an RTL-script reply for bidi tests.
    pub fn with_transform(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Arc::new(f);
        self
    }

    /// The next `complete` call fails with `LlmError::Api`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(message.into());
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCompletion> {
        self.calls.read().unwrap().clone()
    }

    fn take_error(&self) -> Option<String> {
        self.next_error.write().unwrap().take()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.write().unwrap().push(RecordedCompletion {
            system: request.system.clone(),
            prompt: request.prompt.clone(),
        });

        if let Some(message) = self.take_error() {
            return Err(LlmError::Api {
                status: 500,
                message,
            });
        }

        let starts: Vec<usize> = MARKER.find_iter(&request.prompt).map(|m| m.start()).collect();
        let ends: Vec<usize> = MARKER.find_iter(&request.prompt).map(|m| m.end()).collect();
        let indices: Vec<&str> = MARKER
            .captures_iter(&request.prompt)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();

        let mut reply = String::new();
        for (pos, index) in indices.iter().enumerate() {
            let start = ends[pos];
            let end = starts.get(pos + 1).copied().unwrap_or(request.prompt.len());
            let original = request.prompt[start..end].trim();
            reply.push_str(&format!("<<~{}~>> {}\n", index, (self.transform)(original)));
        }

        Ok(CompletionResponse {
            text: reply,
            usage: LlmUsage::default(),
            model: self.model.clone(),
        })
    }
}
