//! Provider-agnostic LLM access for Threadcast.
//!
//! Exposes the [`traits::LlmClient`] interface, concrete clients for Cohere
//! and OpenAI, and [`build_llm_client`] to turn an [`LlmConfig`] into a shared
//! client handle.
//!
//! ```no_run
//! use threadcast_llm::{build_llm_client, LlmConfig};
//!
//! let cfg = LlmConfig::Cohere {
//!     api_key: "key".into(),
//!     model: "command-r".into(),
//!     base_url: None,
//! };
//! let client = build_llm_client(&cfg).expect("client");
//! assert_eq!(client.model_name(), "command-r");
//! ```
#[cfg(feature = "cohere")]
pub mod cohere;
#[cfg(feature = "openai")]
pub mod openai;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;
use traits::{LlmClient, LlmError};

pub const DEFAULT_COHERE_MODEL: &str = "command-r";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Per-request timeout for model calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Which provider to talk to and with what credentials.
#[derive(Clone, PartialEq)]
pub enum LlmConfig {
    Cohere {
        api_key: String,
        model: String,
        base_url: Option<String>,
    },
    OpenAi {
        api_key: String,
        model: String,
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmConfig::Cohere { model, base_url, .. } => f
                .debug_struct("Cohere")
                .field("model", model)
                .field("base_url", base_url)
                .finish_non_exhaustive(),
            LlmConfig::OpenAi { model, base_url, .. } => f
                .debug_struct("OpenAi")
                .field("model", model)
                .field("base_url", base_url)
                .finish_non_exhaustive(),
        }
    }
}

/// Build a shared client for the configured provider.
pub fn build_llm_client(
    config: &LlmConfig,
) -> traits::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        #[cfg(feature = "cohere")]
        LlmConfig::Cohere {
            api_key,
            model,
            base_url,
        } => {
            let base = base_url.as_deref().unwrap_or(cohere::COHERE_API_BASE);
            let client = cohere::CohereClient::with_base_url(base, api_key.clone(), model.clone())?;
            Ok(Arc::new(client))
        }
        #[cfg(feature = "openai")]
        LlmConfig::OpenAi {
            api_key,
            model,
            base_url,
        } => {
            let base = base_url.as_deref().unwrap_or(openai::OPENAI_API_BASE);
            let client = openai::OpenAiClient::with_base_url(base, api_key.clone(), model.clone())?;
            Ok(Arc::new(client))
        }
        #[allow(unreachable_patterns)]
        _ => Err(LlmError::Config("LLM provider not enabled".to_string())),
    }
}
