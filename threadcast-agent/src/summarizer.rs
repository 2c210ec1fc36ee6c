//! Bullet extraction through a hosted chat model.
use std::sync::Arc;

use threadcast_llm::traits::{LlmClient, LlmError};
use threadcast_llm::DEFAULT_TEMPERATURE;

pub const BULLET_MARKER: char = '-';

#[derive(thiserror::Error, Debug)]
pub enum SummarizeError {
    #[error(transparent)]
    Llm(#[from] LlmError),
}

pub struct Summarizer {
    llm: Arc<dyn LlmClient + Send + Sync>,
    temperature: f32,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            llm,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Ask the model for 3-6 bullets. An answer without any dash-prefixed
    /// line yields an empty list, which is data rather than an error.
    pub async fn summarize(&self, article_text: &str) -> Result<Vec<String>, SummarizeError> {
        let prompt = build_prompt(article_text);
        tracing::info!(
            model = self.llm.model_name(),
            article_chars = article_text.chars().count(),
            temperature = self.temperature,
            "summarize.request"
        );

        let response = self
            .llm
            .generate(&prompt, None, None, Some(self.temperature))
            .await?;
        let bullets = parse_bullets(&response.text);

        tracing::info!(bullets = bullets.len(), tokens = ?response.tokens_used, "summarize.done");
        Ok(bullets)
    }

    /// Like [`Self::summarize`], but a failure becomes a single placeholder
    /// bullet so the thread can still be composed.
    pub async fn extract_bullets(&self, article_text: &str) -> Vec<String> {
        match self.summarize(article_text).await {
            Ok(bullets) => bullets,
            Err(e) => {
                tracing::warn!("summarize.failed: {e}");
                vec![error_placeholder(&e)]
            }
        }
    }
}

pub fn error_placeholder(err: &SummarizeError) -> String {
    format!("[Error: {err}]")
}

pub fn build_prompt(article_text: &str) -> String {
    format!(
        r#"
Extract 3 to 6 *brief and distinct bullet points* summarizing the following article. 
Each bullet point should be a short, standalone fact or update — no fluff or storytelling.

Return each point on a new line, starting with a dash ("- ").

Article:
{article_text}
"#
    )
}

/// Keep trimmed lines that start with the dash marker; the marker stays.
pub fn parse_bullets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(BULLET_MARKER))
        .map(str::to_string)
        .collect()
}
