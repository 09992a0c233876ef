// Telegram listener - the inbound edge of the relay.
//
// This is the only module that speaks teloxide. It filters updates down to
// the configured source chats, hands the text to the core relay service, and
// logs the outcome. A failure while processing one message is logged and
// dropped so the listen loop keeps running.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::core::config::{AppConfig, SourceChat};
use crate::core::relay::{RelayOutcome, RelayService};
use crate::infra::discord::DiscordWebhookSender;
use crate::infra::translation::GeminiTranslator;

/// The concrete relay pipeline this binary wires together.
pub type Relay = RelayService<GeminiTranslator, DiscordWebhookSender>;

/// Long-polling listener over the configured source chats.
pub struct TelegramListener {
    bot: Bot,
    source_chats: Arc<Vec<SourceChat>>,
    relay: Arc<Relay>,
    gemini_model: String,
    target_language: String,
}

impl TelegramListener {
    pub fn new(config: &AppConfig, relay: Arc<Relay>) -> Self {
        Self {
            bot: Bot::new(config.telegram_bot_token.clone()),
            source_chats: Arc::new(config.telegram_source_chats.clone()),
            relay,
            gemini_model: config.gemini_model.clone(),
            target_language: config.target_language.clone(),
        }
    }

    /// Start listening and keep the process alive until the dispatcher
    /// stops (Ctrl-C is handled by the dispatcher itself).
    pub async fn start(self) {
        tracing::info!(
            source_chats = ?self.source_chats,
            model = %self.gemini_model,
            target_language = %self.target_language,
            "Relay started, listening for messages"
        );

        // Channel posts and group messages arrive as different update kinds
        // but carry the same Message payload, so both branches share one
        // handler.
        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_channel_post().endpoint(handle_message));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.relay, self.source_chats])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

/// Process one Telegram message event and forward translated content.
async fn handle_message(
    msg: Message,
    relay: Arc<Relay>,
    source_chats: Arc<Vec<SourceChat>>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    if !is_monitored(&source_chats, chat_id, msg.chat.username()) {
        return Ok(());
    }

    // Captioned media counts as text; stickers and bare media do not.
    let Some(source_text) = msg.text().or_else(|| msg.caption()) else {
        tracing::debug!(chat_id, "Skip message without text");
        return Ok(());
    };

    tracing::info!(chat_id, "Received message");
    match relay.relay_text(source_text).await {
        Ok(RelayOutcome::Forwarded { chunk_count }) => {
            tracing::info!(chat_id, chunk_count, "Forwarded translated message to Discord");
        }
        Ok(RelayOutcome::SkippedEmpty) => {
            tracing::debug!(chat_id, "Skip empty message");
        }
        Ok(RelayOutcome::SkippedUntranslated) => {
            tracing::warn!(chat_id, "Translation returned empty content");
        }
        Err(error) => {
            tracing::error!(chat_id, %error, "Failed processing incoming message");
        }
    }

    Ok(())
}

/// Does this chat appear in the configured source list?
///
/// Numeric IDs match exactly; usernames match case-insensitively with any
/// leading `@` ignored on the configured side.
fn is_monitored(source_chats: &[SourceChat], chat_id: i64, username: Option<&str>) -> bool {
    source_chats.iter().any(|source| match source {
        SourceChat::Id(id) => *id == chat_id,
        SourceChat::Username(name) => username
            .map(|u| u.eq_ignore_ascii_case(name.trim_start_matches('@')))
            .unwrap_or(false),
    })
}
