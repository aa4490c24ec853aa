//! Gemini `generateContent` client, preferred provider for detail enrichment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parse;
use crate::prompts;
use crate::providers::{DetailProvider, ProviderError, async_trait};
use crate::types::DiseaseDetails;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<String>>()
            .join("\n");
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

pub struct GeminiText {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl GeminiText {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 2048,
            },
        };

        // Key-in-query is the documented auth scheme for this endpoint.
        let url = format!(
            "{GEMINI_API_BASE}/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .http
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
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

        let body: GenerateResponse = response.json().await?;
        body.text().ok_or(ProviderError::EmptyCompletion)
    }
}

#[async_trait]
impl DetailProvider for GeminiText {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn enrich(&self, disease_name: &str) -> Result<DiseaseDetails, ProviderError> {
        let content = self.generate(prompts::detail_prompt(disease_name)).await?;
        let details: DiseaseDetails = parse::completion_json(&content)?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_parts_are_joined() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "{\"summary\""}, {"text": ": \"x\"}"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().unwrap(), "{\"summary\"\n: \"x\"}");
    }

    #[test]
    fn empty_candidates_yield_none() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn whitespace_only_completion_yields_none() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "  \n"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert!(response.text().is_none());
    }
}
