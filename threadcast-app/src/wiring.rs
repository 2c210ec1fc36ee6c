//! Build the long-lived clients once from configuration.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use threadcast_agent::{Publisher, Summarizer, ThreadAgent};
use threadcast_common::{Result, ThreadcastError};
use threadcast_config::{LlmConfig, ThreadcastConfig, ThreadcastConfigLoader, TwitterConfig};
use threadcast_http::OAuth1Credentials;
use threadcast_llm::build_llm_client;
use threadcast_social::twitter::TwitterApi;
use threadcast_web::ArticleFetcher;

/// Defaults, then `path` if it exists, then environment overrides and `PORT`.
pub fn load_config(path: &Path) -> Result<ThreadcastConfig> {
    ThreadcastConfigLoader::new()
        .with_optional_file(path)
        .with_port_env("PORT")
        .load()
        .map_err(|e| ThreadcastError::Config(format!("{}: {e}", path.display())))
}

pub fn build_agent(cfg: &ThreadcastConfig) -> Result<ThreadAgent> {
    let llm = build_llm_client(&llm_settings(&cfg.llm))
        .map_err(|e| ThreadcastError::Setup(format!("llm client: {e}")))?;
    let summarizer = Summarizer::new(llm).with_temperature(cfg.llm.temperature());

    let twitter = TwitterApi::with_base_url(&cfg.twitter.endpoint, credentials(&cfg.twitter))
        .map_err(|e| ThreadcastError::Setup(format!("twitter client: {e}")))?
        .with_status_url_base(cfg.twitter.status_url_base.clone());
    let publisher = Publisher::new(Arc::new(twitter))
        .with_delay(Duration::from_millis(cfg.twitter.post_delay_ms));

    let fetcher =
        ArticleFetcher::new().map_err(|e| ThreadcastError::Setup(format!("article fetcher: {e}")))?;

    tracing::info!(
        model = %llm_model(&cfg.llm),
        post_delay_ms = cfg.twitter.post_delay_ms,
        twitter = %cfg.twitter.endpoint,
        "agent.ready"
    );
    Ok(ThreadAgent::new(Arc::new(fetcher), summarizer, publisher))
}

fn llm_settings(cfg: &LlmConfig) -> threadcast_llm::LlmConfig {
    match cfg {
        LlmConfig::Cohere {
            model,
            auth_token,
            endpoint,
            ..
        } => threadcast_llm::LlmConfig::Cohere {
            api_key: auth_token.clone(),
            model: model.clone(),
            base_url: Some(endpoint.clone()),
        },
        LlmConfig::Openai {
            model,
            auth_token,
            endpoint,
            ..
        } => threadcast_llm::LlmConfig::OpenAi {
            api_key: auth_token.clone(),
            model: model.clone(),
            base_url: Some(endpoint.clone()),
        },
    }
}

fn llm_model(cfg: &LlmConfig) -> &str {
    match cfg {
        LlmConfig::Cohere { model, .. } | LlmConfig::Openai { model, .. } => model,
    }
}

fn credentials(cfg: &TwitterConfig) -> OAuth1Credentials {
    OAuth1Credentials::new(
        cfg.consumer_key.clone(),
        cfg.consumer_secret.clone(),
        cfg.access_token.clone(),
        cfg.access_token_secret.clone(),
    )
}
