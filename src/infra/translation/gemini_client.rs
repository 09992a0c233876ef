// =============================================================================
// GEMINI TRANSLATOR - Google AI Studio API Integration
// =============================================================================
//
// This module provides the implementation of the `Translator` port that
// communicates with Google's Gemini API (https://ai.google.dev/gemini-api/docs).
//
// **API shape notes:**
// - Authentication: API key is passed as a query parameter (`?key=API_KEY`)
//   rather than a Bearer token in the Authorization header.
// - Request format: Uses `contents[]` with nested `parts`, and
//   `systemInstruction` is a separate top-level field (not a message with
//   role "system").
// - Response format: Text is at `candidates[0].content.parts[*].text`.
//
// **Environment Variables (consumed via AppConfig):**
// - `GEMINI_API_KEY` - Your API key from https://aistudio.google.com/apikey
// - `GEMINI_MODEL` - e.g. `gemini-2.5-flash` (the default)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::relay::{RelayError, Translator};

/// System instruction sent with every translation request. Low temperature
/// plus this prompt keeps the model from editorializing.
const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional translator. \
    Keep facts unchanged, preserve names, tickers, numbers, links, and \
    formatting. Return translation only.";

/// Translations should be deterministic, not creative.
const TRANSLATION_TEMPERATURE: f32 = 0.1;

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================
//
// These structs model the subset of the generateContent request/response
// format the relay needs. See: https://ai.google.dev/api/generate-content

/// A single part of content. Gemini uses a "parts" array to support
/// multimodal content; the relay only ever sends and reads text parts.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// A message in Gemini's expected format with a `parts` array.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    /// Role: "user" or "model".
    role: String,
    parts: Vec<Part>,
}

/// Generation parameters. Only temperature matters for translation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

/// The request body sent to the generateContent endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,

    /// System instruction - separate from the conversation per the API spec.
    system_instruction: Content,

    generation_config: GenerationConfig,
}

/// A candidate response from the model.
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// The response from the generateContent endpoint.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

/// Error payload returned by the Gemini API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

// =============================================================================
// TRANSLATOR IMPLEMENTATION
// =============================================================================

/// Translator backed by Gemini's generateContent endpoint.
pub struct GeminiTranslator {
    client: Client,
    api_key: String,
    model: String,
    target_language: String,
}

impl GeminiTranslator {
    pub fn new(api_key: String, model: String, target_language: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            target_language,
        }
    }

    /// Build a deterministic translation prompt naming the target language.
    fn build_prompt(&self, source_text: &str) -> String {
        format!(
            "Translate the following text to {}. Keep structure, line breaks, and emojis.\n\n{}",
            self.target_language, source_text
        )
    }

    fn build_request(&self, source_text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: self.build_prompt(source_text),
                }],
            }],
            // The system instruction uses the "user" role internally.
            system_instruction: Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: TRANSLATION_SYSTEM_PROMPT.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: TRANSLATION_TEMPERATURE,
            },
        }
    }

    /// Pull the translated text out of a response: all text parts of the
    /// first candidate, concatenated and trimmed. A blocked or empty
    /// response comes back as an empty string ("nothing to forward").
    fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, source_text: &str) -> Result<String, RelayError> {
        let clean_text = source_text.trim();
        if clean_text.is_empty() {
            return Ok(String::new());
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = self.build_request(clean_text);

        tracing::debug!(
            model = %self.model,
            target_language = %self.target_language,
            chars = clean_text.chars().count(),
            "Sending translation request"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Translation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| RelayError::Translation(e.to_string()))?;

            // Prefer the API's own error message when the body parses.
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(RelayError::Translation(format!(
                    "Gemini API error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(RelayError::Translation(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let response_json: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Translation(e.to_string()))?;

        Ok(Self::extract_text(&response_json))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> GeminiTranslator {
        GeminiTranslator::new(
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
            "English".to_string(),
        )
    }

    #[test]
    fn test_prompt_names_target_language_and_keeps_source() {
        let prompt = translator().build_prompt("Hola mundo");
        assert!(prompt.contains("Translate the following text to English."));
        assert!(prompt.ends_with("Hola mundo"));
    }

    #[test]
    fn test_request_serializes_with_camel_case_fields() {
        let request = translator().build_request("Hola");
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"temperature\":0.1"));
        assert!(json.contains("\"contents\""));
    }

    #[test]
    fn test_extract_text_joins_parts_and_trims() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "  Hello "}, {"text": "world\n"}]
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(GeminiTranslator::extract_text(&response), "Hello world");
    }

    #[test]
    fn test_extract_text_handles_missing_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiTranslator::extract_text(&response), "");
    }

    #[test]
    fn test_error_payload_parses_api_message() {
        let parsed: GeminiErrorResponse = serde_json::from_str(
            r#"{"error": {"message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.error.message, "API key not valid.");
    }
}
