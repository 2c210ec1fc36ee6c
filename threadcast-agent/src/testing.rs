//! In-memory collaborators for unit tests.
use std::sync::Mutex;

use async_trait::async_trait;
use threadcast_http::HttpError;
use threadcast_llm::traits::{LlmClient, LlmError, LlmResponse};
use threadcast_social::{PostId, PostSink, SocialError};
use threadcast_web::{Article, ArticleSource, FetchError};

#[derive(Debug, Clone)]
pub struct LlmCall {
    pub prompt: String,
    pub temperature: Option<f32>,
}

pub struct ScriptedLlm {
    answer: Result<String, String>,
    calls: Mutex<Vec<LlmCall>>,
}

impl ScriptedLlm {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        self.calls.lock().unwrap().push(LlmCall {
            prompt: prompt.to_string(),
            temperature,
        });
        match &self.answer {
            Ok(text) => Ok(LlmResponse {
                text: text.clone(),
                model: Some("scripted".into()),
                tokens_used: None,
            }),
            Err(message) => Err(LlmError::Http(HttpError::Network(message.clone()))),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Records every post; optionally fails on the n-th call (0-based).
pub struct RecordingSink {
    fail_on: Option<usize>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostSink for RecordingSink {
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, SocialError> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.len();
        calls.push((text.to_string(), reply_to.map(str::to_string)));
        if self.fail_on == Some(n) {
            return Err(SocialError::MissingData("rate limited".into()));
        }
        Ok(format!("id-{}", n + 1))
    }

    fn post_url(&self, id: &str) -> String {
        format!("https://twitter.com/user/status/{id}")
    }
}

pub struct StaticSource {
    article: Option<Article>,
}

impl StaticSource {
    pub fn article(title: &str, body: &str) -> Self {
        Self {
            article: Some(Article {
                url: "https://news.example/story".into(),
                title: title.into(),
                body: body.into(),
            }),
        }
    }

    pub fn unavailable() -> Self {
        Self { article: None }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        match &self.article {
            Some(article) => Ok(Article {
                url: url.to_string(),
                ..article.clone()
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            }),
        }
    }
}
