//! Fetch, summarize, compose and publish one article.
use std::sync::Arc;

use threadcast_web::{ArticleSource, FetchError};

use crate::composer::compose_thread;
use crate::publisher::{failure_line, PublishError, PublishedThread, Publisher};
use crate::summarizer::{error_placeholder, SummarizeError, Summarizer};

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// What happened during one run.
#[derive(Debug)]
pub struct RunReport {
    pub url: String,
    /// Composed chunks; empty when the article could not be fetched.
    pub thread: Vec<String>,
    /// Set when the model failed and the thread carries the placeholder bullet.
    pub degraded: Option<SummarizeError>,
    pub outcome: Result<PublishedThread, AgentError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Text shown in the web form.
    pub fn render(&self) -> String {
        match &self.outcome {
            Err(AgentError::Fetch(e)) => format!("❌ Error: {e}"),
            Err(AgentError::Publish(e)) => format!("{}\n\n{}", self.render_thread(), failure_line(e)),
            Ok(published) => format!(
                "{}\n\n✅ Tweet thread posted: {}",
                self.render_thread(),
                published.url
            ),
        }
    }

    fn render_thread(&self) -> String {
        let total = self.thread.len();
        self.thread
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("[{}/{total}]\n{chunk}", i + 1))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub struct ThreadAgent {
    source: Arc<dyn ArticleSource>,
    summarizer: Summarizer,
    publisher: Publisher,
}

impl ThreadAgent {
    pub fn new(source: Arc<dyn ArticleSource>, summarizer: Summarizer, publisher: Publisher) -> Self {
        Self {
            source,
            summarizer,
            publisher,
        }
    }

    #[tracing::instrument(name = "agent.run", skip(self))]
    pub async fn run(&self, url: &str) -> RunReport {
        let url = url.trim().to_string();

        let article = match self.source.fetch(&url).await {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!("agent.fetch_failed: {e}");
                return RunReport {
                    url,
                    thread: Vec::new(),
                    degraded: None,
                    outcome: Err(e.into()),
                };
            }
        };
        tracing::info!(title = %article.title, body_chars = article.body.chars().count(), "agent.fetched");

        let (bullets, degraded) = match self.summarizer.summarize(&article.body).await {
            Ok(bullets) => (bullets, None),
            Err(e) => {
                tracing::warn!("agent.summarize_degraded: {e}");
                (vec![error_placeholder(&e)], Some(e))
            }
        };

        let thread = compose_thread(&article.title, &url, &bullets);
        tracing::info!(chunks = thread.len(), "agent.composed");

        let outcome = self.publisher.publish(&thread).await.map_err(AgentError::from);
        RunReport {
            url,
            thread,
            degraded,
            outcome,
        }
    }

    /// Run and render in one step; never fails.
    pub async fn run_agent(&self, url: &str) -> String {
        self.run(url).await.render()
    }
}
