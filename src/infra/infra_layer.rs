// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "translation/gemini_client.rs"]
pub mod translation;

#[path = "discord/webhook_sender.rs"]
pub mod discord;
