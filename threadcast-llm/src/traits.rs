use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use threadcast_http::HttpError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] HttpError),

    #[error("model {0} returned no text")]
    EmptyResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// A hosted chat/completion model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with an optional system prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}
