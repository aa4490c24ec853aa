use base64::Engine;
use serde::{Deserialize, Serialize};

fn unknown() -> String {
    "Unknown".to_string()
}

/// Raw upload bytes plus the media type inferred from the file name.
/// Lives only for the duration of a single analysis call.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub media_type: String,
}

impl ImagePayload {
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: media_type.into(),
        }
    }

    pub fn from_file_name(data: Vec<u8>, file_name: Option<&str>) -> Self {
        let media_type = file_name
            .map(Self::media_type_for)
            .unwrap_or("image/jpeg");
        Self::new(data, media_type)
    }

    pub fn media_type_for(file_name: &str) -> &'static str {
        let lower = file_name.to_lowercase();
        match lower.rsplit('.').next() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/jpeg",
        }
    }

    /// Data URL for OpenAI-style image parts.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{}", self.media_type, encoded)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiseaseDetails {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiseaseDetails {
    /// Static payload served when no enrichment provider has credentials.
    pub fn not_configured() -> Self {
        Self {
            summary: "Cannot fetch details.".to_string(),
            symptoms: vec!["API Key missing (Gemini/Groq)".to_string()],
            error: Some("API Key not configured".to_string()),
            ..Self::default()
        }
    }

    /// Static payload served when every enrichment provider failed.
    pub fn unavailable() -> Self {
        Self {
            summary: "Disease details could not be loaded right now.".to_string(),
            symptoms: vec!["No data available".to_string()],
            treatment: vec!["Consult a local agricultural expert".to_string()],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionAnalysis {
    #[serde(default = "unknown")]
    pub plant_name: String,
    #[serde(default = "unknown")]
    pub disease_name: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub details: DiseaseDetails,
}

impl VisionAnalysis {
    /// Confidence outside [0, 1] is invalid; clamp it, and treat NaN as 0.
    pub fn sanitized(mut self) -> Self {
        self.confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        };
        self
    }
}

/// Response envelope for the front-end client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub prediction: String,
    pub plant: String,
    pub accuracy: String,
    pub details: DiseaseDetails,
}

impl AnalyzeResponse {
    pub fn from_analysis(analysis: VisionAnalysis) -> Self {
        let analysis = analysis.sanitized();
        Self {
            prediction: analysis.disease_name,
            plant: analysis.plant_name,
            accuracy: format!("{:.2}%", analysis.confidence * 100.0),
            details: analysis.details,
        }
    }
}
