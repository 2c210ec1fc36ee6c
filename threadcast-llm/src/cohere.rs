//! Cohere chat endpoint (`POST /v1/chat`).
use crate::traits::{LlmClient, LlmError, LlmResponse, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use threadcast_http::HttpClient;

pub const COHERE_API_BASE: &str = "https://api.cohere.com/v1/";

pub struct CohereClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    meta: Option<ChatMeta>,
}

#[derive(Debug, Deserialize)]
struct ChatMeta {
    #[serde(default)]
    billed_units: Option<BilledUnits>,
}

#[derive(Debug, Deserialize)]
struct BilledUnits {
    #[serde(default)]
    input_tokens: Option<f64>,
    #[serde(default)]
    output_tokens: Option<f64>,
}

impl CohereClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(COHERE_API_BASE, api_key, model)
    }

    /// Point the client at another deployment (or a test server).
    pub fn with_base_url(base_url: &str, api_key: String, model: String) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|e| LlmError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(crate::REQUEST_TIMEOUT);
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for CohereClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let req = ChatRequest {
            model: &self.model,
            message: prompt,
            preamble: system_prompt,
            temperature,
            max_tokens,
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "cohere.chat");
        let resp: ChatResponse = self
            .client
            .post_json("chat", Some(&self.api_key), &req)
            .await?;

        if resp.text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(self.model.clone()));
        }

        let tokens_used = resp
            .meta
            .and_then(|m| m.billed_units)
            .map(|u| (u.input_tokens.unwrap_or(0.0) + u.output_tokens.unwrap_or(0.0)) as u32);

        Ok(LlmResponse {
            text: resp.text,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
