//! Groq chat-completions client (OpenAI-compatible wire format), used both
//! for vision analysis and as the text fallback for detail enrichment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parse;
use crate::prompts;
use crate::providers::{DetailProvider, ProviderError, VisionProvider, async_trait};
use crate::types::{DiseaseDetails, ImagePayload, VisionAnalysis};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const TEXT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct GroqClient {
    api_key: String,
    http: reqwest::Client,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion)
    }
}

/// Vision analysis over Groq's multimodal completion endpoint.
pub struct GroqVision {
    client: GroqClient,
}

impl GroqVision {
    pub fn new(client: GroqClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionProvider for GroqVision {
    fn name(&self) -> &str {
        "groq-vision"
    }

    async fn analyze(&self, image: &ImagePayload) -> Result<VisionAnalysis, ProviderError> {
        let request = ChatRequest {
            model: VISION_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(prompts::VISION_SYSTEM.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: prompts::VISION_PROMPT.to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: image.to_data_url(),
                            },
                        },
                    ]),
                },
            ],
            temperature: 0.1,
            max_tokens: 2048,
            response_format: ResponseFormat::json_object(),
        };

        let content = self.client.complete(&request).await?;
        let analysis: VisionAnalysis = parse::completion_json(&content)?;
        Ok(analysis)
    }
}

/// Text-only detail enrichment over the same endpoint.
pub struct GroqText {
    client: GroqClient,
}

impl GroqText {
    pub fn new(client: GroqClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetailProvider for GroqText {
    fn name(&self) -> &str {
        "groq"
    }

    async fn enrich(&self, disease_name: &str) -> Result<DiseaseDetails, ProviderError> {
        let request = ChatRequest {
            model: TEXT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(prompts::DETAIL_SYSTEM.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Text(prompts::detail_prompt(disease_name)),
                },
            ],
            temperature: 0.3,
            max_tokens: 2048,
            response_format: ResponseFormat::json_object(),
        };

        let content = self.client.complete(&request).await?;
        let details: DiseaseDetails = parse::completion_json(&content)?;
        Ok(details)
    }
}
