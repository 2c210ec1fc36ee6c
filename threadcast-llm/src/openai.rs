//! OpenAI Responses endpoint (`POST /v1/responses`).
use crate::traits::{LlmClient, LlmError, LlmResponse, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use threadcast_http::HttpClient;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CreateResponse<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    model: String,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl ResponseBody {
    /// Text of the first `output_text` part, skipping reasoning and tool items.
    fn first_output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .flat_map(|item| &item.content)
            .find(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
    }
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(OPENAI_API_BASE, api_key, model)
    }

    /// OpenAI-compatible gateways or a test server.
    pub fn with_base_url(base_url: &str, api_key: String, model: String) -> Result<Self> {
        HttpClient::new(base_url)
            .map(|client| client.with_timeout(crate::REQUEST_TIMEOUT))
            .map(|client| Self {
                client,
                api_key,
                model,
            })
            .map_err(|e| LlmError::Config(format!("HttpClient init failed: {e}")))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "openai.responses");
        let body: ResponseBody = self
            .client
            .post_json(
                "responses",
                Some(&self.api_key),
                &CreateResponse {
                    model: &self.model,
                    input: prompt,
                    instructions: system_prompt,
                    temperature,
                    max_output_tokens: max_tokens,
                },
            )
            .await?;

        let text = match body.first_output_text() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => return Err(LlmError::EmptyResponse(body.model)),
        };
        Ok(LlmResponse {
            text,
            tokens_used: body.usage.and_then(|u| u.total_tokens),
            model: Some(body.model),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
