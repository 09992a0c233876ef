// This is the entry point of the Telegram -> Discord relay.
//
// **Architecture Overview:**
// - `core/` = Business logic (chunking, relay orchestration, config)
// - `infra/` = Implementations of core traits (Gemini API, Discord webhook)
// - `telegram/` = Telegram-specific adapter (inbound events)
//
// This file's job is to:
// 1. Initialize logging
// 2. Load configuration
// 3. Wire services together (dependency injection)
// 4. Start the listener and map failures to exit codes

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "telegram/telegram_layer.rs"]
mod telegram;

use std::process::ExitCode;
use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::relay::RelayService;
use crate::infra::discord::DiscordWebhookSender;
use crate::infra::translation::GeminiTranslator;
use crate::telegram::listener::TelegramListener;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Exit code 2 = configuration problem, so supervisors can tell "fix your
    // env" apart from runtime failures.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Invalid configuration: {}", error);
            return ExitCode::from(2);
        }
    };

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create the relay pipeline with its dependencies.
    // This is the "composition root" where we wire everything together.

    let translator = GeminiTranslator::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.target_language.clone(),
    );

    let sender = match DiscordWebhookSender::new(
        config.discord_webhook_url.clone(),
        config.discord_timeout,
    ) {
        Ok(sender) => sender,
        Err(error) => {
            tracing::error!("Failed to build Discord webhook sender: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let relay = Arc::new(RelayService::new(
        translator,
        sender,
        config.discord_message_limit,
    ));

    // ========================================================================
    // TELEGRAM LISTENER
    // ========================================================================
    // The dispatcher long-polls until Ctrl-C; a clean stop is exit code 0.

    TelegramListener::new(&config, relay).start().await;

    tracing::info!("Relay stopped");
    ExitCode::SUCCESS
}
