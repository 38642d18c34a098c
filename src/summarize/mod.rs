//! Map-reduce summarization pipeline.
//!
//! The orchestrator decides between a single remote call for short documents
//! and a chunked map-reduce path for long ones, and degrades at every stage:
//! no credential means local summaries, a failed chunk call means a local
//! summary for that chunk, and a failed synthesis call means the partial
//! summaries joined as-is. The public API never returns an error; the caller
//! always receives a usable string.

pub mod chunking;
pub mod fallback;
mod prompt;
pub mod remote;

pub use chunking::{Chunk, chunk_text};
pub use fallback::fallback_summarize;
pub use remote::{ChatClientError, ChatCompletionClient, ChatRequest, HttpChatClient};

use crate::config::Config;
use fallback::degrade;
use prompt::{render_block_prompt, render_synthesis_prompt};

/// Fixed reply for blank input.
pub const NO_CONTENT_MESSAGE: &str = "No content to summarize.";

/// Tuning values for the summarization pipeline.
///
/// Constructed explicitly (usually via [`SummarizerSettings::from_config`])
/// so tests can drive the orchestrator without touching process-wide state.
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    /// Model identifier sent with every remote request.
    pub model: String,
    /// Documents at or under this many characters are summarized in one call.
    pub single_pass_threshold: usize,
    /// Window size, in characters, for the chunked path.
    pub max_chunk_size: usize,
    /// Overlap, in characters, between adjacent chunks.
    pub chunk_overlap: usize,
    /// Sampling temperature for single-pass and chunk calls.
    pub single_pass_temperature: f32,
    /// Sampling temperature for the final synthesis call.
    pub synthesis_temperature: f32,
    /// Token ceiling for chunk-level and synthesis calls.
    pub chunk_token_ceiling: u32,
    /// Lower bound on the proportional single-pass token budget.
    pub min_token_budget: u32,
    /// Upper bound on the proportional single-pass token budget.
    pub max_token_budget: u32,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            model: crate::config::DEFAULT_MODEL.to_string(),
            single_pass_threshold: 8000,
            max_chunk_size: 6000,
            chunk_overlap: 200,
            single_pass_temperature: 0.5,
            synthesis_temperature: 0.4,
            chunk_token_ceiling: 2800,
            min_token_budget: 256,
            max_token_budget: 1024,
        }
    }
}

impl SummarizerSettings {
    /// Snapshot the summarization-relevant configuration values.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            model: config.model().to_string(),
            single_pass_threshold: config
                .single_pass_threshold
                .unwrap_or(defaults.single_pass_threshold),
            max_chunk_size: config.chunk_size.unwrap_or(defaults.max_chunk_size).max(1),
            chunk_overlap: config.chunk_overlap.unwrap_or(defaults.chunk_overlap),
            ..defaults
        }
    }
}

/// Map-reduce summarization orchestrator.
///
/// Holds read-only settings and an optional remote client; without a client
/// every document is summarized locally. All state lives within one
/// [`Summarizer::summarize`] call, so a single instance serves any number of
/// concurrent requests.
pub struct Summarizer {
    settings: SummarizerSettings,
    client: Option<Box<dyn ChatCompletionClient>>,
}

impl Summarizer {
    /// Build an orchestrator from explicit settings and an optional client.
    pub fn new(settings: SummarizerSettings, client: Option<Box<dyn ChatCompletionClient>>) -> Self {
        Self { settings, client }
    }

    /// Build an orchestrator from loaded configuration, wiring the HTTP
    /// client when a credential is present.
    pub fn from_config(config: &Config) -> Self {
        let client: Option<Box<dyn ChatCompletionClient>> =
            config.summarizer_api_key.as_ref().map(|key| {
                Box::new(HttpChatClient::new(config.api_url().to_string(), key.clone()))
                    as Box<dyn ChatCompletionClient>
            });
        if client.is_none() {
            tracing::info!("No summarizer credential configured; using local summaries only");
        }
        Self::new(SummarizerSettings::from_config(config), client)
    }

    /// Summarize a document, always returning a usable string.
    ///
    /// Blank input returns a fixed no-content message. Short documents take
    /// the single-pass path with a token budget proportional to their length;
    /// longer documents are chunked, summarized piecewise in document order,
    /// and synthesized into one final summary. Every remote failure degrades
    /// to the next-best local result.
    pub async fn summarize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return NO_CONTENT_MESSAGE.to_string();
        }

        let Some(client) = self.client.as_deref() else {
            tracing::debug!("Summarizing locally (no remote client)");
            return fallback_summarize(text);
        };

        let char_count = text.chars().count();
        if char_count <= self.settings.single_pass_threshold {
            let budget = (u32::try_from(char_count / 4).unwrap_or(u32::MAX)).clamp(
                self.settings.min_token_budget,
                self.settings.max_token_budget,
            );
            tracing::debug!(char_count, budget, "Single-pass summarization");
            return self
                .summarize_block(client, text, self.settings.single_pass_temperature, budget)
                .await;
        }

        let chunks = chunk_text(text, self.settings.max_chunk_size, self.settings.chunk_overlap);
        tracing::info!(
            char_count,
            chunk_count = chunks.len(),
            "Map-reduce summarization"
        );

        // Chunks are summarized sequentially in document order; the synthesis
        // prompt depends on that order.
        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let partial = self
                .summarize_block(
                    client,
                    &chunk.text,
                    self.settings.single_pass_temperature,
                    self.settings.chunk_token_ceiling,
                )
                .await;
            partials.push(partial);
        }

        let synthesis = client
            .complete(ChatRequest {
                model: self.settings.model.clone(),
                prompt: render_synthesis_prompt(&partials),
                temperature: self.settings.synthesis_temperature,
                max_tokens: self.settings.chunk_token_ceiling,
            })
            .await;

        match synthesis {
            Ok(body) if !body.trim().is_empty() => body,
            Ok(_) => {
                tracing::warn!("Synthesis returned an empty body; joining partial summaries");
                partials.join("\n\n")
            }
            Err(error) => {
                tracing::warn!(error = %error, "Synthesis failed; joining partial summaries");
                partials.join("\n\n")
            }
        }
    }

    /// Summarize one block of text (whole document or a single chunk),
    /// degrading to the local fallback on any remote failure.
    async fn summarize_block(
        &self,
        client: &dyn ChatCompletionClient,
        text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> String {
        let outcome = client
            .complete(ChatRequest {
                model: self.settings.model.clone(),
                prompt: render_block_prompt(text),
                temperature,
                max_tokens,
            })
            .await;
        degrade(outcome, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    type Responder = Box<dyn Fn(usize, &ChatRequest) -> Result<String, ChatClientError> + Send + Sync>;

    struct StubChatClient {
        calls: Mutex<Vec<ChatRequest>>,
        next_call: AtomicUsize,
        responder: Responder,
    }

    impl StubChatClient {
        fn new(responder: Responder) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                next_call: AtomicUsize::new(0),
                responder,
            })
        }

        fn failing() -> Arc<Self> {
            Self::new(Box::new(|_, _| {
                Err(ChatClientError::GenerationFailed("502: bad gateway".into()))
            }))
        }

        fn recorded(&self) -> Vec<ChatRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletionClient for Arc<StubChatClient> {
        async fn complete(&self, request: ChatRequest) -> Result<String, ChatClientError> {
            let index = self.next_call.fetch_add(1, Ordering::SeqCst);
            let result = (self.responder)(index, &request);
            self.calls.lock().unwrap().push(request);
            result
        }
    }

    fn summarizer_with(client: Arc<StubChatClient>) -> Summarizer {
        Summarizer::new(SummarizerSettings::default(), Some(Box::new(client)))
    }

    fn echo_client() -> Arc<StubChatClient> {
        StubChatClient::new(Box::new(|index, _| Ok(format!("OK:{index}"))))
    }

    #[tokio::test]
    async fn blank_input_returns_no_content_message() {
        let summarizer = summarizer_with(echo_client());
        assert_eq!(summarizer.summarize("").await, NO_CONTENT_MESSAGE);
        assert_eq!(summarizer.summarize("   \n\t").await, NO_CONTENT_MESSAGE);

        let local = Summarizer::new(SummarizerSettings::default(), None);
        assert_eq!(local.summarize("").await, NO_CONTENT_MESSAGE);
    }

    #[tokio::test]
    async fn missing_client_uses_local_fallback() {
        let summarizer = Summarizer::new(SummarizerSettings::default(), None);
        let text = "One\nTwo\nThree\nFour\nFive\nSix\nSeven";
        assert_eq!(summarizer.summarize(text).await, fallback_summarize(text));
    }

    #[tokio::test]
    async fn short_document_takes_single_pass_path() {
        let text = (1..=50)
            .map(|n| format!("Line {n}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.chars().count() < 6000);

        let client = echo_client();
        let summarizer = summarizer_with(client.clone());
        let summary = summarizer.summarize(&text).await;
        assert_eq!(summary, "OK:0");

        let calls = client.recorded();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].temperature - 0.5).abs() < f32::EPSILON);
        assert!(calls[0].prompt.contains("Line 50"));
    }

    #[tokio::test]
    async fn single_pass_token_budget_is_proportional_and_clamped() {
        let client = echo_client();
        let summarizer = summarizer_with(client.clone());

        summarizer.summarize(&"a".repeat(4000)).await;
        summarizer.summarize("tiny").await;
        summarizer.summarize(&"b".repeat(8000)).await;

        let calls = client.recorded();
        assert_eq!(calls[0].max_tokens, 1000);
        assert_eq!(calls[1].max_tokens, 256);
        // 8000 chars sit exactly at the threshold; 2000 clamps to the cap
        assert_eq!(calls[2].max_tokens, 1024);
    }

    #[tokio::test]
    async fn long_document_takes_map_reduce_path() {
        let text = "k".repeat(20_000);
        let client = echo_client();
        let summarizer = summarizer_with(client.clone());
        let summary = summarizer.summarize(&text).await;

        let calls = client.recorded();
        // 4 chunk calls plus 1 synthesis call
        assert_eq!(calls.len(), 5);
        for call in &calls[..4] {
            assert_eq!(call.max_tokens, 2800);
            assert!((call.temperature - 0.5).abs() < f32::EPSILON);
        }
        let synthesis = &calls[4];
        assert!((synthesis.temperature - 0.4).abs() < f32::EPSILON);
        let first = synthesis.prompt.find("- OK:0").unwrap();
        let last = synthesis.prompt.find("- OK:3").unwrap();
        assert!(first < last);
        assert_eq!(summary, "OK:4");
    }

    #[tokio::test]
    async fn synthesis_failure_joins_partial_summaries() {
        let text = "j".repeat(20_000);
        let client = StubChatClient::new(Box::new(|index, _| {
            if index < 4 {
                Ok(format!("Partial {index}"))
            } else {
                Err(ChatClientError::GenerationFailed("500".into()))
            }
        }));
        let summarizer = summarizer_with(client);
        let summary = summarizer.summarize(&text).await;
        assert_eq!(summary, "Partial 0\n\nPartial 1\n\nPartial 2\n\nPartial 3");
    }

    #[tokio::test]
    async fn total_failure_on_short_text_matches_local_fallback() {
        let text = "A short paragraph about nothing in particular.";
        let summarizer = summarizer_with(StubChatClient::failing());
        assert_eq!(summarizer.summarize(text).await, fallback_summarize(text));
    }

    #[tokio::test]
    async fn total_failure_on_long_text_yields_joined_chunk_fallbacks() {
        let text = "word ".repeat(4000);
        let client = StubChatClient::failing();
        let summarizer = summarizer_with(client.clone());
        let summary = summarizer.summarize(&text).await;

        assert!(!summary.trim().is_empty());
        // every chunk degraded to its local fallback, then synthesis degraded
        // to the blank-line join
        let chunk_calls = client.recorded().len() - 1;
        assert_eq!(summary.split("\n\n").count(), chunk_calls);
    }

    #[tokio::test]
    async fn settings_overrides_flow_from_config() {
        let config = Config {
            summarizer_api_key: Some("key".into()),
            summarizer_api_url: None,
            summarizer_model: Some("custom-model".into()),
            upload_dir: None,
            server_port: None,
            single_pass_threshold: Some(100),
            chunk_size: Some(40),
            chunk_overlap: Some(10),
        };
        let settings = SummarizerSettings::from_config(&config);
        assert_eq!(settings.model, "custom-model");
        assert_eq!(settings.single_pass_threshold, 100);
        assert_eq!(settings.max_chunk_size, 40);
        assert_eq!(settings.chunk_overlap, 10);
        assert_eq!(settings.chunk_token_ceiling, 2800);
    }
}
