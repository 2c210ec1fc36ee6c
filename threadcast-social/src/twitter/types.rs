use serde::{Deserialize, Serialize};

/// Body for `POST /2/tweets`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplySettings<'a>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplySettings<'a> {
    pub in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    #[serde(default)]
    pub data: Option<PostedTweet>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostedTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ApiProblem {
    pub fn describe(&self) -> &str {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("unknown error")
    }
}
