//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{GatewayError, GenerationGateway};
use crate::config::GeminiConfig;

/// Gemini REST client
pub struct GeminiGateway {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

/// Request body
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Response body, only the fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

/// Parts may carry non-text payloads (inline data, function calls)
#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiGateway {
    /// Create a client from configuration
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GatewayError> {
        debug!(model = %config.model_name, base_url = %config.base_url, "from_config: called");
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        let http = Client::builder().build().map_err(GatewayError::Network)?;

        Ok(Self {
            model: config.model_name.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn build_request(prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    }
}

/// Pull the first text part out of a successful response body
fn extract_text(body: &str) -> Result<String, GatewayError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "failed to parse Gemini response");
        GatewayError::MalformedResponse(e.to_string())
    })?;

    info!(candidates = response.candidates.len(), "response received");

    if let Some(usage) = &response.usage_metadata {
        info!(
            prompt_tokens = ?usage.prompt_token_count,
            response_tokens = ?usage.candidates_token_count,
            total_tokens = ?usage.total_token_count,
            "token usage"
        );
    }

    let Some(first) = response.candidates.into_iter().next() else {
        error!("no candidates in response");
        return Err(GatewayError::EmptyResponse);
    };

    let parts = first.content.map(|c| c.parts).unwrap_or_default();
    let Some(part) = parts.into_iter().next() else {
        error!("first candidate has no parts");
        return Err(GatewayError::EmptyResponse);
    };

    part.text
        .ok_or_else(|| GatewayError::MalformedResponse("first part carries no text".to_string()))
}

/// Best-effort message from an error body, the status line when it is blank
fn error_message(status: StatusCode, body: &str) -> String {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    };
    if message.is_empty() { format!("HTTP {}", status) } else { message }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        info!(model = %self.model, prompt_len = prompt.len(), "sending request to Gemini");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, body_len = body.len(), "Gemini response status");

        if !status.is_success() {
            let message = error_message(status, &body);
            error!(status = status.as_u16(), %message, "Gemini API error");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_text(&body)?;
        info!(response_len = text.len(), "successfully received response");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model_name: "gemini-2.0-flash".to_string(),
            base_url: "https://example.test/v1beta/".to_string(),
        }
    }

    #[test]
    fn test_from_config() {
        let gateway = GeminiGateway::from_config(&test_config()).unwrap();
        assert_eq!(gateway.name(), "gemini");
        assert_eq!(
            gateway.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = GeminiConfig {
            api_key: String::new(),
            ..test_config()
        };
        assert!(matches!(GeminiGateway::from_config(&config), Err(GatewayError::MissingApiKey)));
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(build_request("hello")).unwrap();
        assert_eq!(body, serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] }));
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{
            "candidates": [{ "content": { "parts": [{ "text": "world" }, { "text": "ignored" }] } }],
            "usageMetadata": { "promptTokenCount": 1, "candidatesTokenCount": 1, "totalTokenCount": 2 }
        }"#;
        assert_eq!(extract_text(body).unwrap(), "world");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        assert!(matches!(extract_text(r#"{"candidates": []}"#), Err(GatewayError::EmptyResponse)));
        assert!(matches!(extract_text("{}"), Err(GatewayError::EmptyResponse)));
    }

    #[test]
    fn test_extract_text_no_parts() {
        let body = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        assert!(matches!(extract_text(body), Err(GatewayError::EmptyResponse)));

        let blocked = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(extract_text(blocked), Err(GatewayError::EmptyResponse)));
    }

    #[test]
    fn test_extract_text_non_text_part() {
        let body = r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "f"}}]}}]}"#;
        assert!(matches!(extract_text(body), Err(GatewayError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_text_not_json() {
        assert!(matches!(extract_text("<html>"), Err(GatewayError::MalformedResponse(_))));
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "API key not valid");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
    }

    #[test]
    fn test_error_message_blank_body_uses_status() {
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, ""),
            "HTTP 429 Too Many Requests"
        );
    }
}
