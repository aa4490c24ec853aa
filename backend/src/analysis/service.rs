use std::env;
use std::sync::Arc;

use shared::providers::gemini::GeminiText;
use shared::providers::groq::{GroqClient, GroqText, GroqVision};
use shared::providers::{
    DetailChain, DetailProvider, ProviderError, VisionChain, VisionProvider,
};
use shared::types::{DiseaseDetails, ImagePayload, VisionAnalysis};

/// API credentials read once at process start. Absence of a key simply
/// disables that provider path.
pub struct ProviderCredentials {
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl ProviderCredentials {
    pub fn from_env() -> Self {
        Self {
            groq_api_key: credential("GROQ_API_KEY"),
            gemini_api_key: credential("GEMINI_API_KEY"),
        }
    }
}

fn credential(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct AnalysisService {
    vision: Arc<VisionChain>,
    details: Arc<DetailChain>,
}

impl AnalysisService {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        let mut vision: Vec<Box<dyn VisionProvider>> = Vec::new();
        // Enrichment prefers Gemini; Groq is the fallback.
        let mut details: Vec<Box<dyn DetailProvider>> = Vec::new();

        if let Some(key) = &credentials.gemini_api_key {
            details.push(Box::new(GeminiText::new(key.clone())));
        }
        if let Some(key) = &credentials.groq_api_key {
            let client = GroqClient::new(key.clone());
            vision.push(Box::new(GroqVision::new(client.clone())));
            details.push(Box::new(GroqText::new(client)));
        }

        Self::with_chains(VisionChain::new(vision), DetailChain::new(details))
    }

    pub fn with_chains(vision: VisionChain, details: DetailChain) -> Self {
        Self {
            vision: Arc::new(vision),
            details: Arc::new(details),
        }
    }

    pub async fn analyze_image(
        &self,
        image: &ImagePayload,
    ) -> Result<VisionAnalysis, ProviderError> {
        self.vision.analyze(image).await
    }

    pub async fn disease_details(&self, disease_name: &str) -> DiseaseDetails {
        self.details.enrich(disease_name).await
    }
}
