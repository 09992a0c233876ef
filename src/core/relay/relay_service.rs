// This is the relay module - it contains the business logic for moving one
// message from the source chat to the notification channel. Notice how this
// module has NO Telegram, Gemini, or Discord code in it (no teloxide, no
// reqwest imports). It works with plain strings and two ports, so the same
// pipeline could sit behind any listener or in front of any sender.

use async_trait::async_trait;
use thiserror::Error;

use super::chunker::{split_message, ChunkError};

// ============================================================================
// ERRORS
// ============================================================================
// We define our own error types rather than using generic errors.
// This makes error handling explicit and documents what can go wrong.

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error(transparent)]
    Chunking(#[from] ChunkError),
}

// ============================================================================
// PORTS
// ============================================================================
// The core defines WHAT it needs, but not HOW it's implemented.
// The infra layer provides the actual implementations (Gemini, webhook).

/// Trait for translating source text into the configured target language.
///
/// Returns the translated text, or an empty string to signal "nothing to
/// forward" (the provider had no usable output for this input).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, source_text: &str) -> Result<String, RelayError>;
}

/// Trait for delivering one chunk to the notification channel.
///
/// Each call is an independent delivery attempt; there is no retry policy at
/// this layer.
#[async_trait]
pub trait ChunkSender: Send + Sync {
    async fn send(&self, content: &str) -> Result<(), RelayError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// What happened to one inbound message.
///
/// The listener layer logs these; the service itself performs no logging so
/// it stays trivially testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Input was blank - nothing was translated or sent.
    SkippedEmpty,
    /// The translator returned empty content - nothing was sent.
    SkippedUntranslated,
    /// All chunks were delivered.
    Forwarded { chunk_count: usize },
}

/// The main service for relaying messages.
///
/// **Generic over its ports:**
/// The service doesn't care whether the translator is Gemini or a test mock,
/// or whether the sender posts to Discord or collects chunks in memory - it
/// just uses the traits.
pub struct RelayService<T: Translator, S: ChunkSender> {
    translator: T,
    sender: S,

    /// Maximum characters per outbound message. Comes from config because
    /// different sender backends impose different caps.
    chunk_limit: usize,
}

impl<T: Translator, S: ChunkSender> RelayService<T, S> {
    pub fn new(translator: T, sender: S, chunk_limit: usize) -> Self {
        Self {
            translator,
            sender,
            chunk_limit,
        }
    }

    /// Process one inbound message end to end.
    ///
    /// **Returns:**
    /// - `Ok(RelayOutcome::SkippedEmpty)` for blank input (no API calls made)
    /// - `Ok(RelayOutcome::SkippedUntranslated)` when translation comes back empty
    /// - `Ok(RelayOutcome::Forwarded { .. })` when every chunk was delivered
    /// - `Err(...)` for translation, chunking, or delivery failures
    ///
    /// The first delivery failure aborts the remaining chunks of this
    /// message; later messages are unaffected because the service holds no
    /// per-message state.
    pub async fn relay_text(&self, source_text: &str) -> Result<RelayOutcome, RelayError> {
        let trimmed = source_text.trim();
        if trimmed.is_empty() {
            return Ok(RelayOutcome::SkippedEmpty);
        }

        let translated = self.translator.translate(trimmed).await?;
        if translated.is_empty() {
            return Ok(RelayOutcome::SkippedUntranslated);
        }

        let chunks = split_message(&translated, self.chunk_limit)?;
        let chunk_count = chunks.len();
        for chunk in &chunks {
            self.sender.send(chunk).await?;
        }

        Ok(RelayOutcome::Forwarded { chunk_count })
    }
}

// ============================================================================
// TESTS
// ============================================================================
