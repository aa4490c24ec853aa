//! Instruction prompts sent to the hosted completion APIs.

pub const VISION_SYSTEM: &str = "You are a professional plant pathologist. \
Identify the plant and the disease affecting it from the supplied image. \
Your output must be valid JSON.";

pub const VISION_PROMPT: &str = r#"Analyze this plant image. Identify the plant and its disease (if any).
If the plant is healthy, say it is healthy.

Respond ONLY with valid JSON in the following format:
{
    "plant_name": "Name of the plant",
    "disease_name": "Name of the disease, or 'Healthy'",
    "confidence": 0.95,
    "reasons": ["Visual cue 1", "Visual cue 2"],
    "details": {
        "summary": "Short explanation of the disease or condition",
        "symptoms": ["Symptom 1", "Symptom 2"],
        "treatment": ["Treatment 1", "Treatment 2"],
        "prevention": ["Prevention 1", "Prevention 2"],
        "environment": ["Environmental factor"]
    }
}

If the image is not a plant or is unclear, set "plant_name": "Unknown",
"disease_name": "Unknown" and "confidence": 0.0."#;

pub const DETAIL_SYSTEM: &str = "You are a professional agricultural expert. \
Give accurate, practical answers a farmer can act on. \
Your output must be valid JSON.";

/// Prompt for the text-only enrichment call, given a detected disease name.
pub fn detail_prompt(disease_name: &str) -> String {
    format!(
        r#"A plant scan detected the disease: "{disease_name}".

Provide detailed information about this disease.

Respond ONLY with valid JSON using the following structure:
{{
    "summary": "What the disease is, its cause (fungus/bacteria/virus), and its impact on the plant.",
    "symptoms": [
        "Visual symptoms on the leaves",
        "Symptoms on stems or fruit",
        "Early signs of infection"
    ],
    "treatment": [
        "First treatment step (e.g. a specific fungicide)",
        "How to handle infected parts",
        "Organic or chemical options"
    ],
    "prevention": [
        "Steps to stop it from spreading",
        "Garden sanitation practices",
        "Resistant varieties to choose"
    ],
    "environment": [
        "Weather conditions that trigger it (e.g. humid, hot)",
        "Ideal temperature for the disease to develop",
        "Other environmental factors (soil, water)"
    ]
}}"#
    )
}
