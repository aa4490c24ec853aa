use serde::de::DeserializeOwned;

/// Extract the JSON object from model output that may be wrapped in
/// markdown code fences or surrounded by prose.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Parse a completion into `T` after stripping optional fencing.
/// Missing fields fall back to their serde defaults.
pub fn completion_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(extract_json(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VisionAnalysis;

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"disease_name\": \"Rust\"}\n```";
        assert_eq!(extract_json(fenced), "{\"disease_name\": \"Rust\"}");
    }

    #[test]
    fn strips_bare_fence() {
        let fenced = "```\n{\"disease_name\": \"Rust\"}\n```";
        assert_eq!(extract_json(fenced), "{\"disease_name\": \"Rust\"}");
    }

    #[test]
    fn fenced_and_unfenced_parse_identically() {
        let unfenced = r#"{"plant_name": "Apple", "disease_name": "Scab", "confidence": 0.8}"#;
        let fenced = format!("```json\n{unfenced}\n```");

        let a: VisionAnalysis = completion_json(unfenced).unwrap();
        let b: VisionAnalysis = completion_json(&fenced).unwrap();
        assert_eq!(a.plant_name, b.plant_name);
        assert_eq!(a.disease_name, b.disease_name);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn recovers_object_embedded_in_prose() {
        let noisy = "Here is the result: {\"disease_name\": \"Blight\"} Hope that helps!";
        assert_eq!(extract_json(noisy), "{\"disease_name\": \"Blight\"}");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let analysis: VisionAnalysis = completion_json("{\"confidence\": 0.4}").unwrap();
        assert_eq!(analysis.plant_name, "Unknown");
        assert_eq!(analysis.disease_name, "Unknown");
        assert!(analysis.reasons.is_empty());
        assert!(analysis.details.symptoms.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(completion_json::<VisionAnalysis>("the model refused").is_err());
    }
}
