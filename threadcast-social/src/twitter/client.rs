//! Thin wrapper around `POST /2/tweets` using the shared HTTP client.
use crate::twitter::types::{CreateTweetRequest, CreateTweetResponse, PostedTweet, ReplySettings};
use crate::{PostId, PostSink, SocialError};
use async_trait::async_trait;
use threadcast_http::{Auth, HttpClient, HttpError, OAuth1Credentials, RequestOpts};

pub const TWITTER_API_BASE: &str = "https://api.twitter.com/";
pub const DEFAULT_STATUS_URL_BASE: &str = "https://twitter.com/user/status/";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    credentials: OAuth1Credentials,
    status_url_base: String,
}

impl TwitterApi {
    pub fn new(credentials: OAuth1Credentials) -> Result<Self, HttpError> {
        Self::with_base_url(TWITTER_API_BASE, credentials)
    }

    pub fn with_base_url(base_url: &str, credentials: OAuth1Credentials) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            credentials,
            status_url_base: DEFAULT_STATUS_URL_BASE.to_string(),
        })
    }

    pub fn with_status_url_base(mut self, base: impl Into<String>) -> Self {
        self.status_url_base = base.into();
        self
    }

    /// Create a post, optionally replying to `reply_to`.
    pub async fn create_tweet(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<PostedTweet, SocialError> {
        let body = CreateTweetRequest {
            text,
            reply: reply_to.map(|id| ReplySettings {
                in_reply_to_tweet_id: id,
            }),
        };

        let resp: CreateTweetResponse = self
            .http
            .post_json_opts(
                "2/tweets",
                &body,
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.credentials)),
                    ..Default::default()
                },
            )
            .await?;

        match resp.data {
            Some(tweet) => {
                tracing::info!(id = %tweet.id, reply_to = ?reply_to, chars = text.chars().count(), "twitter.post.created");
                Ok(tweet)
            }
            None => {
                let detail = resp
                    .errors
                    .unwrap_or_default()
                    .iter()
                    .map(|e| e.describe().to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(SocialError::MissingData(if detail.is_empty() {
                    "empty response".to_string()
                } else {
                    detail
                }))
            }
        }
    }

    pub fn status_url(&self, id: &str) -> String {
        format!("{}{}", self.status_url_base, id)
    }
}

#[async_trait]
impl PostSink for TwitterApi {
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, SocialError> {
        self.create_tweet(text, reply_to).await.map(|t| t.id)
    }

    fn post_url(&self, id: &str) -> String {
        self.status_url(id)
    }
}
