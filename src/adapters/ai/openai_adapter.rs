//! OpenAI-compatible adapter for room-photo critique.
//!
//! Supports OpenAI API, Azure OpenAI, and local OpenAI-compatible servers.
//! Implements `VisionPort`: one multimodal request per call, the fixed
//! critique prompt plus a single inlined JPEG, one text response in full.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{CapturedImage, DomainError};
use crate::ports::VisionPort;

/// Per-request ceiling; vision answers are slow but bounded.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Fixed instruction prompt. The parser depends only on the response shape
/// this requests: numbered, colon-terminated bold headings with optional
/// `*` bullet lines. Rewording the dimensions is a content decision.
const CRITIQUE_PROMPT: &str = "\
You are an experienced interior designer. Critique the room in the attached \
photo across exactly these seven dimensions, in this order:

1. Design Style
2. Color Palette
3. Furniture
4. Lighting
5. Layout & Function
6. Strengths & Suggestions
7. Room Type

Introduce each dimension as a numbered bold heading ending with a colon, for \
example **1. Design Style:** followed by your observations in short \
sentences. Where you list individual pointers, put each on its own line \
starting with \"* \". Estimate the room type in the final dimension. Do not \
add any other headings.";

/// OpenAI-compatible vision adapter.
pub struct OpenAiVisionAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiVisionAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - chat completions endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key; a blank key makes `analyze` fail fast with a
    ///   configuration error before any network I/O
    /// * `model` - vision-capable model name (e.g., "gpt-4o-mini")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn data_url(image: &CapturedImage) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&image.jpeg))
    }
}

/// OpenAI API request structure (multimodal message content).
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl VisionPort for OpenAiVisionAdapter {
    async fn analyze(&self, image: &CapturedImage) -> Result<String, DomainError> {
        // Fail fast: no credential, no network attempt.
        if self.api_key.trim().is_empty() {
            return Err(DomainError::Config(
                "ROOMLENS_AI_API_KEY is not set".to_string(),
            ));
        }

        info!(
            model = %self.model,
            photo = %image.display_name(),
            payload_bytes = image.jpeg.len(),
            "sending photo to vision service"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: CRITIQUE_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: Self::data_url(image),
                        },
                    },
                ],
            }],
            temperature: 0.4,
            max_tokens: 1024,
        };

        let response = self
            .client
            .post(&self.api_url)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "vision API returned error");
            return Err(DomainError::Transport(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Transport(format!("failed to parse API response: {e}")))?;

        let raw = chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if raw.is_empty() {
            return Err(DomainError::EmptyResponse);
        }

        debug!(raw_len = raw.len(), "received critique text");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> CapturedImage {
        CapturedImage::new("/p/room.jpg", vec![0xff, 0xd8, 0xff, 0xe0])
    }

    #[tokio::test]
    async fn blank_key_fails_before_network() {
        // Unroutable URL: if the adapter attempted I/O the error would be
        // Transport, not Config.
        let adapter = OpenAiVisionAdapter::new(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            "  ".to_string(),
            "gpt-4o-mini".to_string(),
        );

        let err = adapter.analyze(&image()).await.unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn prompt_requests_all_seven_dimensions() {
        for dimension in [
            "Design Style",
            "Color Palette",
            "Furniture",
            "Lighting",
            "Layout & Function",
            "Strengths & Suggestions",
            "Room Type",
        ] {
            assert!(CRITIQUE_PROMPT.contains(dimension), "missing {dimension}");
        }
        assert!(CRITIQUE_PROMPT.contains("**1. Design Style:**"));
    }

    #[test]
    fn data_url_has_jpeg_media_type() {
        let url = OpenAiVisionAdapter::data_url(&image());
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn content_parts_serialize_with_openai_tags() {
        let text = serde_json::to_value(ContentPart::Text {
            text: "hi".to_string(),
        })
        .expect("serialize text part");
        assert_eq!(text["type"], "text");

        let img = serde_json::to_value(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/jpeg;base64,AAAA".to_string(),
            },
        })
        .expect("serialize image part");
        assert_eq!(img["type"], "image_url");
        assert_eq!(img["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }
}
