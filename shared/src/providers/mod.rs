pub mod gemini;
pub mod groq;

pub use async_trait::async_trait;
use log::warn;

use crate::types::{DiseaseDetails, ImagePayload, VisionAnalysis};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no provider is configured (missing API key)")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("completion contained no content")]
    EmptyCompletion,
    #[error("completion was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A hosted multimodal completion API that can describe a plant image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(&self, image: &ImagePayload) -> Result<VisionAnalysis, ProviderError>;
}

/// A hosted text completion API that can describe a disease by name.
#[async_trait]
pub trait DetailProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn enrich(&self, disease_name: &str) -> Result<DiseaseDetails, ProviderError>;
}

/// Ordered vision fallback: providers are tried in sequence and the first
/// success wins. Exhaustion surfaces the last error to the caller, which
/// maps it to a 503 (service) or a failure envelope (CLI).
pub struct VisionChain {
    providers: Vec<Box<dyn VisionProvider>>,
}

impl VisionChain {
    pub fn new(providers: Vec<Box<dyn VisionProvider>>) -> Self {
        Self { providers }
    }

    pub async fn analyze(&self, image: &ImagePayload) -> Result<VisionAnalysis, ProviderError> {
        let mut last_error = ProviderError::NotConfigured;
        for provider in &self.providers {
            match provider.analyze(image).await {
                Ok(analysis) => return Ok(analysis.sanitized()),
                Err(e) => {
                    warn!("Vision provider {} failed: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

/// Ordered enrichment fallback. This chain never errors: with no providers
/// configured it returns the static "API Key not configured" payload, and
/// when every provider fails it returns the static unavailable payload.
pub struct DetailChain {
    providers: Vec<Box<dyn DetailProvider>>,
}

impl DetailChain {
    pub fn new(providers: Vec<Box<dyn DetailProvider>>) -> Self {
        Self { providers }
    }

    pub async fn enrich(&self, disease_name: &str) -> DiseaseDetails {
        if self.providers.is_empty() {
            return DiseaseDetails::not_configured();
        }

        for provider in &self.providers {
            match provider.enrich(disease_name).await {
                Ok(details) => return details,
                Err(e) => warn!("Detail provider {} failed: {}", provider.name(), e),
            }
        }

        DiseaseDetails::unavailable()
    }
}
