//! Post a composed thread as a reply chain.
//!
//! The first chunk becomes a top-level post, every later chunk replies to the
//! one before it. Posts already created are left in place when a later one
//! fails; [`PublishError::Failed`] reports their ids so the caller can tell
//! the user what is live.
use std::sync::Arc;
use std::time::Duration;

use threadcast_social::{PostId, PostSink, SocialError};

/// Pause between consecutive posts of one thread.
pub const DEFAULT_POST_DELAY: Duration = Duration::from_secs(2);

#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("nothing to publish: every chunk was blank")]
    NothingToPublish,

    #[error("post {} of {total} failed ({} already live): {source}", .index + 1, .posted.len())]
    Failed {
        posted: Vec<PostId>,
        index: usize,
        total: usize,
        #[source]
        source: SocialError,
    },
}

impl PublishError {
    /// Ids of posts that went out before the failure.
    pub fn posted(&self) -> &[PostId] {
        match self {
            PublishError::NothingToPublish => &[],
            PublishError::Failed { posted, .. } => posted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedThread {
    /// Ids in thread order; the first is the thread root.
    pub post_ids: Vec<PostId>,
    /// Public link to the root post.
    pub url: String,
}

pub struct Publisher {
    sink: Arc<dyn PostSink>,
    delay: Duration,
}

impl Publisher {
    pub fn new(sink: Arc<dyn PostSink>) -> Self {
        Self {
            sink,
            delay: DEFAULT_POST_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn publish<S: AsRef<str>>(&self, chunks: &[S]) -> Result<PublishedThread, PublishError> {
        let clean: Vec<&str> = chunks
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .collect();
        if clean.is_empty() {
            return Err(PublishError::NothingToPublish);
        }

        let total = clean.len();
        let mut posted: Vec<PostId> = Vec::with_capacity(total);
        for (index, text) in clean.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }
            let reply_to = posted.last().map(String::as_str);
            match self.sink.create_post(text, reply_to).await {
                Ok(id) => {
                    tracing::info!(index, total, id = %id, reply_to = ?reply_to, "publish.post_created");
                    posted.push(id);
                }
                Err(source) => {
                    tracing::warn!(index, total, live = posted.len(), "publish.failed: {source}");
                    return Err(PublishError::Failed {
                        posted,
                        index,
                        total,
                        source,
                    });
                }
            }
        }

        let url = self.sink.post_url(&posted[0]);
        tracing::info!(posts = posted.len(), url = %url, "publish.done");
        Ok(PublishedThread {
            post_ids: posted,
            url,
        })
    }

    /// Link to the thread root, or a bracketed failure line.
    pub async fn publish_thread<S: AsRef<str>>(&self, chunks: &[S]) -> String {
        match self.publish(chunks).await {
            Ok(thread) => thread.url,
            Err(e) => failure_line(&e),
        }
    }
}

pub fn failure_line(err: &PublishError) -> String {
    format!("[Tweeting failed ❌: {err}]")
}
