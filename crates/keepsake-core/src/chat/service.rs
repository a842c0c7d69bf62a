//! Chat service orchestrating one conversation turn.
//!
//! ChatService owns the memory store and the completion provider. A turn
//! loads live memories, composes the augmented prompt, calls the provider,
//! extracts any memory directive from the reply, and persists the new record.

use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use keepsake_types::error::PersistenceError;
use keepsake_types::llm::{CompletionRequest, LlmError, Message};
use keepsake_types::memory::MemoryRecord;

use crate::chat::persona::DEFAULT_PERSONA;
use crate::chat::prompt::{build_messages, summarize_memories};
use crate::llm::provider::LlmProvider;
use crate::memory::directive::extract_memory;
use crate::memory::persistence::MemoryPersistence;
use crate::memory::store::MemoryStore;

/// Model parameters and persona for every turn.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub persona: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Upper bound on a single completion call.
    pub request_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            model: "gpt-4".to_string(),
            max_tokens: 1024,
            temperature: Some(0.8),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// What happened to the memory a turn produced.
#[derive(Debug)]
pub enum MemoryWrite {
    /// The reply carried no (usable) directive.
    Nothing,
    /// A new record was persisted.
    Saved(MemoryRecord),
    /// The record's content was already stored.
    AlreadyKnown(MemoryRecord),
    /// Persisting the record failed; the reply was still delivered.
    Failed {
        record: MemoryRecord,
        error: PersistenceError,
    },
}

/// Result of a successful turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// Assistant reply with any directive stripped.
    pub reply: String,
    /// Input history plus the user message and the cleaned reply.
    pub history: Vec<Message>,
    pub memory: MemoryWrite,
}

/// Errors that abort a turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("no message provided")]
    EmptyMessage,

    #[error("failed to load memories: {0}")]
    Memory(#[from] PersistenceError),

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
}

/// Orchestrates conversation turns over a memory store and a completion provider.
///
/// Generic over `MemoryPersistence` and `LlmProvider` so keepsake-core never
/// depends on keepsake-infra.
pub struct ChatService<P: MemoryPersistence, L: LlmProvider> {
    store: MemoryStore<P>,
    provider: L,
    settings: ChatSettings,
}

impl<P: MemoryPersistence, L: LlmProvider> ChatService<P, L> {
    pub fn new(store: MemoryStore<P>, provider: L, settings: ChatSettings) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    /// Access the memory store.
    pub fn store(&self) -> &MemoryStore<P> {
        &self.store
    }

    /// Access the completion provider.
    pub fn provider(&self) -> &L {
        &self.provider
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Live memories as of now.
    pub async fn memories(&self) -> Result<Vec<MemoryRecord>, PersistenceError> {
        self.store.load_all().await
    }

    /// Remove expired memories from the backing store. Returns how many were removed.
    pub async fn prune(&self) -> Result<usize, PersistenceError> {
        self.store.prune_and_persist().await
    }

    /// Run one conversation turn.
    ///
    /// `history` is the conversation so far, excluding `user_message`. On a
    /// completion failure nothing is persisted and the caller's history is
    /// left as it was.
    #[tracing::instrument(skip_all, fields(provider = %self.provider.name(), history_len = history.len()))]
    pub async fn run_turn(
        &self,
        user_message: &str,
        history: &[Message],
    ) -> Result<TurnOutcome, TurnError> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let memories = self.store.load_all().await?;
        let summaries = summarize_memories(&memories);

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: build_messages(&self.settings.persona, &summaries, history, user_message),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let timeout = self.settings.request_timeout;
        let response = match tokio::time::timeout(timeout, self.provider.complete(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "Completion timed out");
                return Err(TurnError::Completion(LlmError::Timeout(timeout.as_secs())));
            }
        };

        let extraction = extract_memory(&response.content, Utc::now());
        let memory = match extraction.record {
            None => MemoryWrite::Nothing,
            Some(record) => self.persist(record).await,
        };

        let mut updated = Vec::with_capacity(history.len() + 2);
        updated.extend_from_slice(history);
        updated.push(Message::user(user_message));
        updated.push(Message::assistant(extraction.reply.clone()));

        info!(
            memories = memories.len(),
            output_tokens = response.usage.output_tokens,
            "Turn complete"
        );

        Ok(TurnOutcome {
            reply: extraction.reply,
            history: updated,
            memory,
        })
    }

    async fn persist(&self, record: MemoryRecord) -> MemoryWrite {
        match self.store.merge_and_persist(vec![record.clone()]).await {
            Ok(added) if added.is_empty() => MemoryWrite::AlreadyKnown(record),
            Ok(_) => {
                info!(timeframe = %record.timeframe, content = %record.content, "Saved memory");
                MemoryWrite::Saved(record)
            }
            Err(e) => {
                error!(error = %e, content = %record.content, "Failed to persist memory");
                MemoryWrite::Failed { record, error: e }
            }
        }
    }
}
