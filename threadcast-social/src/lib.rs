//! Social network clients used by Threadcast.
//!
//! Only Twitter/X is implemented. Publishing code depends on the [`PostSink`]
//! seam rather than on [`twitter::TwitterApi`] directly, so tests can swap in
//! an in-memory sink.
pub mod twitter;

use async_trait::async_trait;
use threadcast_http::HttpError;

#[derive(thiserror::Error, Debug)]
pub enum SocialError {
    #[error("platform request failed: {0}")]
    Http(#[from] HttpError),

    #[error("platform response carried no post data: {0}")]
    MissingData(String),
}

/// Identifier of a post as assigned by the platform.
pub type PostId = String;

/// Something that can create posts, optionally as replies.
#[async_trait]
pub trait PostSink: Send + Sync {
    /// Create a post; `reply_to` makes it a reply to that post.
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, SocialError>;

    /// Public link for a post id.
    fn post_url(&self, id: &str) -> String;
}
