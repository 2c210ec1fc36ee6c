use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::extract::extract_article;
use crate::{Article, ArticleSource, FetchError};

const USER_AGENT: &str = concat!("threadcast/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads pages over HTTP(S) and extracts their article text.
#[derive(Clone)]
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

fn parse_article_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

#[async_trait]
impl ArticleSource for ArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        let parsed = parse_article_url(url)?;
        tracing::info!(url = %parsed, "article.fetch.start");

        let response = self.client.get(parsed.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %parsed, %status, "article.fetch.status");
            return Err(FetchError::Status {
                url: parsed.to_string(),
                status: status.as_u16(),
            });
        }
        let html = response.text().await?;

        let article = extract_article(url.trim(), &html);
        if article.body.trim().is_empty() {
            return Err(FetchError::NoContent(parsed.to_string()));
        }

        tracing::info!(
            url = %parsed,
            title = %article.title,
            body_chars = article.body.chars().count(),
            "article.fetch.done"
        );
        Ok(article)
    }
}
