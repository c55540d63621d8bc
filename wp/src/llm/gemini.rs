//! Gemini API client implementation
//!
//! Implements the LlmClient trait against the `generateContent` REST
//! endpoint. One prompt in, one text response out. There is deliberately no
//! retry or backoff here: a failed oracle call surfaces immediately as an
//! error result and the request that triggered it is aborted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use crate::config::OracleConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from oracle configuration
    pub fn from_config(config: &OracleConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the request body for the generateContent endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, prompt_len = request.prompt.len(), "build_request_body: called");
        serde_json::json!({
            "contents": [{
                "parts": [{ "text": request.prompt }]
            }]
        })
    }

    /// Flatten a generateContent response into plain text
    fn parse_response(&self, api_response: GeminiResponse) -> CompletionResponse {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");
        let content = api_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty());

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        CompletionResponse { content, usage }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "complete: called");
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("complete: success");
        let api_response: GeminiResponse = response.json().await?;
        Ok(self.parse_response(api_response))
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient {
            model: "gemini-2.0-flash-lite".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            http: Client::new(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let client = test_client();
        let body = client.build_request_body(&CompletionRequest {
            prompt: "extract tasks".to_string(),
        });
        assert_eq!(body["contents"][0]["parts"][0]["text"], "extract tasks");
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let client = test_client();
        let api_response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{"text": "{\"tasks\":"}, {"text": "[]}"}] }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
        }))
        .unwrap();

        let response = client.parse_response(api_response);
        assert_eq!(response.content, Some("{\"tasks\":[]}".to_string()));
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let client = test_client();
        let api_response: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let response = client.parse_response(api_response);
        assert_eq!(response.content, None);
    }
}
