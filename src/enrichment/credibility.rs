//! Parsing and formatting of structured credibility replies.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use super::EnrichmentError;

const DEFAULT_LEVEL: &str = "Unknown";
const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CredibilityAssessment {
    #[serde(default)]
    pub credibility_level: Option<String>,
    /// Between 0 and 1
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl CredibilityAssessment {
    /// Parse a model reply, tolerating a surrounding markdown code fence.
    /// The reply must be a JSON object.
    pub fn parse(reply: &str) -> Result<Self, EnrichmentError> {
        let value: Value = serde_json::from_str(extract_json(reply))?;
        if !value.is_object() {
            return Err(serde_json::Error::custom("credibility reply is not a JSON object").into());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn label(&self) -> String {
        format_credibility(
            self.credibility_level.as_deref().unwrap_or(DEFAULT_LEVEL),
            self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        )
    }
}

/// `"High (85.0% confidence)"`
pub fn format_credibility(level: &str, confidence: f64) -> String {
    format!("{} ({:.1}% confidence)", level, confidence * 100.0)
}

fn extract_json(reply: &str) -> &str {
    if reply.contains("```json") {
        reply
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(reply)
            .trim()
    } else if reply.contains("```") {
        reply.split("```").nth(1).unwrap_or(reply).trim()
    } else {
        reply.trim()
    }
}
