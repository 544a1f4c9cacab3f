use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LlmError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Configuration for the LLM client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 400,
            temperature: 0.7,
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Google Gemini provider implementation
pub struct GeminiProvider {
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client,
        }
    }

    async fn call_gemini(&self, request: &GeminiRequest) -> Result<GeminiResponse, LlmError> {
        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model);
        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            check_status(status, &error_text)?;
            unreachable!("check_status rejects non-success statuses");
        }

        response.json::<GeminiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        info!("Generating LLM completion (model: {}, max_tokens: {})", self.model, self.max_tokens);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.max_tokens,
                temperature: self.temperature,
            },
        };

        let response = self.call_gemini(&request).await?;

        if let Some(usage) = &response.usage_metadata {
            info!("LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                  usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count);
        }

        extract_text(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), LlmError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimited);
    }
    if !status.is_success() {
        return Err(LlmError::ApiError(format!("HTTP {}: {}", status, body)));
    }
    Ok(())
}

fn extract_text(response: GeminiResponse) -> Result<String, LlmError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::InvalidResponse("No candidates in response".to_string()));
    }
    Ok(text)
}

/// Stand-in used when no API key is configured
pub struct DisabledLlm;

#[async_trait]
impl LlmProvider for DisabledLlm {
    async fn generate_completion(&self, _prompt: String) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }

    fn model(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK, "").is_ok());
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED"),
            Err(LlmError::RateLimited)
        ));
        match check_status(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL") {
            Err(LlmError::ApiError(msg)) => assert!(msg.contains("500")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let json = r#"{
            "candidates": [{"content": {"parts": [{"text": "Tesla is "}, {"text": "volatile."}], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 5, "totalTokenCount": 45}
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Tesla is volatile.");
    }

    #[test]
    fn test_extract_text_without_candidates_is_error() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_text(response), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_request_uses_camel_case() {
        let request = GeminiRequest {
            contents: vec![GeminiContent { parts: vec![GeminiPart { text: "hi".into() }] }],
            generation_config: GeminiGenerationConfig { max_output_tokens: 10, temperature: 0.5 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 10);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn test_disabled_llm_reports_not_configured() {
        let llm = DisabledLlm;
        assert!(matches!(
            llm.generate_completion("anything".into()).await,
            Err(LlmError::NotConfigured)
        ));
    }
}
