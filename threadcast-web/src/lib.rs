//! Article acquisition: download a page and reduce it to a title and body.
//!
//! - [`ArticleSource`]: the seam the pipeline depends on
//! - [`fetch::ArticleFetcher`]: reqwest download plus `scraper` extraction
//! - [`extract`]: pure HTML-to-[`Article`] helpers

pub mod extract;
pub mod fetch;

use async_trait::async_trait;

pub use fetch::ArticleFetcher;

/// A fetched article. Produced once per request and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    /// Empty when the page carries no usable title.
    pub title: String,
    pub body: String,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("invalid article URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch article: {0}")]
    Network(#[from] reqwest::Error),

    #[error("article server answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("no readable content found at {0}")]
    NoContent(String),
}

/// Anything that can turn a URL into an [`Article`].
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError>;
}
