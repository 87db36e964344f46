//! Parse LLM output into a principle extraction

use crate::error::ExtractorError;
use distill_domain::PrincipleExtraction;
use serde::Deserialize;

/// Shape of the JSON object the prompt asks for
#[derive(Deserialize)]
struct RawPrinciple {
    core_principle: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

/// Parse an LLM JSON response into a principle extraction
///
/// Missing confidence defaults to 0.5. An empty principle or a confidence
/// outside [0, 1] is rejected.
pub fn parse_principle_response(response: &str) -> Result<PrincipleExtraction, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let raw: RawPrinciple = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let core_principle = raw
        .core_principle
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ExtractorError::InvalidFormat("Missing or empty 'core_principle'".to_string()))?;

    let confidence = raw.confidence.unwrap_or(0.5);
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ExtractorError::InvalidFormat(format!(
            "Confidence {} outside [0, 1]",
            confidence
        )));
    }

    Ok(PrincipleExtraction {
        core_principle,
        confidence,
        reasoning: raw.reasoning,
    })
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence and, when present, the closing one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
