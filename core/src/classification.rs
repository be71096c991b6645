use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Result returned by the classification service. Only ever built from a
/// successful response, never synthesized locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// "Produtivo" / "Improdutivo" or a locale equivalent
    pub category: String,
    /// Model confidence in [0, 1]
    pub confidence: f64,
    pub suggested_response: String,
    pub is_urgent: bool,
}

impl ClassificationResult {
    /// Parse and shape-check a response body.
    pub fn from_body(body: &[u8]) -> Result<Self, TransportError> {
        let result: Self = serde_json::from_slice(body)
            .map_err(|e| TransportError::MalformedBody(e.to_string()))?;
        if !(0.0..=1.0).contains(&result.confidence) {
            return Err(TransportError::MalformedBody(format!(
                "confidence {} is outside [0, 1]",
                result.confidence
            )));
        }
        Ok(result)
    }

    pub fn is_productive(&self) -> bool {
        is_productive_category(&self.category)
    }
}

pub fn is_productive_category(category: &str) -> bool {
    let category = category.trim();
    category.eq_ignore_ascii_case("produtivo") || category.eq_ignore_ascii_case("productive")
}

/// Body of `POST /classify-text`
#[derive(Debug, Serialize)]
pub struct ClassifyTextRequest<'a> {
    pub text: &'a str,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
}
