//! Minimal JSON-over-HTTP client with safe logging and pluggable auth.
//!
//! - Request options: headers, [`Auth`], query params, timeout
//! - Redacts sensitive query params and never logs secret values
//! - Signs OAuth 1.0a requests per attempt (see [`oauth`])
//! - Optional *raw* request/response logging via `THREADCAST_HTTP_RAW=1`
//!
//! Requests are sent exactly once. Creating a post is not idempotent, so a
//! blind resend after a timeout could publish the same chunk twice.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), threadcast_http::HttpError> {
//! let client = threadcast_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .post_json_opts("v1/items", &serde_json::json!({"a": 1}), Default::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`).

pub mod oauth;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub use oauth::OAuth1Credentials;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "THREADCAST_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        if let Ok(s) = std::str::from_utf8(bytes) {
            let s = snip(s, RAW_MAX_BODY, "…");
            parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
        } else {
            parts.push(format!("--data-binary @- # ({} bytes)", bytes.len()));
        }
    }
    let (host_path, query) = redact_query(url);
    let query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        parts.push(format!("'{}://{}'", url.scheme(), host_path));
    } else {
        parts.push(format!("'{}://{}?{}'", url.scheme(), host_path, query));
    }
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for API errors, `None` for transport/build failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the client.
///
/// ```
/// use threadcast_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// match bearer {
///     Auth::Bearer(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Authorization: OAuth ... (signed per request)
    OAuth1(&'a OAuth1Credentials),
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::OAuth1(_) => "oauth1",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use threadcast_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Bearer("demo")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.query.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use threadcast_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(30));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(30),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// POST JSON with optional Bearer auth.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let opts = RequestOpts {
            auth: bearer.map(Auth::Bearer),
            ..Default::default()
        };
        self.request_json(Method::POST, path, Some(body), opts)
            .await
    }

    /// POST JSON with per-request options.
    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body), opts)
            .await
    }

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.target_url(path, opts.query.as_deref())?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        let headers = authorize(
            opts.headers.clone().unwrap_or_default(),
            opts.auth.as_ref(),
            &method,
            &url,
        )?;

        let req_id = next_request_id();
        let (host_path, redacted_q) = redact_query(&url);
        tracing::debug!(
            req_id = %req_id,
            method = %method,
            host_path = %host_path,
            query = ?redacted_q,
            timeout_ms = timeout.as_millis() as u64,
            auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none"),
            has_body = payload.is_some(),
            "http.request.start"
        );
        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers, payload.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let mut rb = self
            .inner
            .request(method, url)
            .timeout(timeout)
            .headers(headers);
        if let Some(bytes) = payload {
            rb = rb
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let started = std::time::Instant::now();
        let network = |err: reqwest::Error| {
            tracing::warn!(req_id = %req_id, message = %err, "http.network_error");
            HttpError::Network(err.to_string())
        };
        let resp = rb.send().await.map_err(network)?;
        let status = resp.status();
        let meta = ResponseMeta::from_headers(resp.headers());
        let bytes = resp.bytes().await.map_err(network)?;
        meta.log(&req_id, status, started.elapsed(), &bytes);

        let snippet = snip_body(&bytes);
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(req_id = %req_id, serde_err = %e, body_snippet = %snippet, "http.response.decode_error");
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message_multi(&bytes);
        tracing::warn!(
            req_id = %req_id,
            %status,
            message = %message,
            x_request_id = %meta.request_id,
            body_snippet = %snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: meta.request_id,
        })
    }

    fn target_url(&self, path: &str, query: Option<&[(&str, Cow<'_, str>)]>) -> Result<Url, HttpError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;
        if let Some(pairs) = query {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_ref())));
        }
        Ok(url)
    }
}

/// Add the `Authorization` header for `auth`. OAuth signs the final URL, so
/// query parameters must already be on it.
fn authorize(
    mut headers: HeaderMap,
    auth: Option<&Auth<'_>>,
    method: &Method,
    url: &Url,
) -> Result<HeaderMap, HttpError> {
    let value = match auth {
        Some(Auth::Bearer(tok)) => format!("Bearer {}", sanitize_api_key(tok)?),
        Some(Auth::OAuth1(creds)) => creds.authorization_header(method, url, &[])?,
        None => return Ok(headers),
    };
    let value = HeaderValue::from_str(&value)
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

fn next_request_id() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("r{nanos:x}")
}

/// Response headers worth keeping for logs and errors.
struct ResponseMeta {
    request_id: String,
    rate_remaining: Option<String>,
    rate_reset: Option<String>,
    raw_headers: Option<Vec<(String, String)>>,
}

impl ResponseMeta {
    fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            request_id: text("x-request-id")
                .or_else(|| text("x-transaction-id"))
                .unwrap_or_else(|| "-".to_string()),
            rate_remaining: text("x-rate-limit-remaining"),
            rate_reset: text("x-rate-limit-reset"),
            raw_headers: raw_enabled().then(|| redact_headers(headers)),
        }
    }

    fn log(&self, req_id: &str, status: StatusCode, elapsed: Duration, body: &[u8]) {
        let duration_ms = elapsed.as_millis() as u64;
        tracing::debug!(
            req_id = %req_id,
            %status,
            duration_ms,
            body_len = body.len(),
            x_request_id = %self.request_id,
            rate_limit.remaining = ?self.rate_remaining,
            rate_limit.reset = ?self.rate_reset,
            "http.response.headers"
        );
        if let Some(headers) = &self.raw_headers {
            let text = String::from_utf8_lossy(&body[..body.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms,
                headers = ?headers,
                body = %text,
                truncated = body.len() > RAW_MAX_BODY
            );
        }
    }
}

// ==============================
// Helpers
// ==============================

/// Query keys whose values never reach the logs.
const SECRET_QUERY_KEYS: &[&str] = &[
    "access_token",
    "api_key",
    "auth",
    "authorization",
    "bearer",
    "client_secret",
    "key",
    "secret",
    "token",
];

/// JSON pointers tried in order when a provider reports an error:
/// OpenAI (`error.message`), Twitter v2 (`errors[0]` or problem `detail`),
/// Cohere and generic (`message`, `detail`, `error`).
const ERROR_MESSAGE_POINTERS: &[&str] = &[
    "/error/message",
    "/errors/0/message",
    "/errors/0/detail",
    "/errors/0/title",
    "/message",
    "/detail",
    "/error",
    "/title",
];

fn extract_error_message_multi(body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|json| {
            ERROR_MESSAGE_POINTERS
                .iter()
                .filter_map(|ptr| json.pointer(ptr).and_then(|v| v.as_str()))
                .find(|msg| !msg.trim().is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| snip_body(body))
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    (0..=max.min(s.len()))
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

fn snip(text: &str, max: usize, marker: &str) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    format!("{}{marker}", &text[..floor_char_boundary(text, max)])
}

fn snip_body(body: &[u8]) -> String {
    snip(&String::from_utf8_lossy(body), 500, "...")
}

/// Strip quotes and whitespace pasted along with a key; reject what cannot be
/// sent in a header.
fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let key: String = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    match key.bytes().find(|b| !b.is_ascii() || b.is_ascii_control()) {
        _ if key.is_empty() => Err(HttpError::Build("API key is empty".into())),
        Some(b) if !b.is_ascii() => Err(HttpError::Build("API key contains non-ASCII bytes".into())),
        Some(_) => Err(HttpError::Build("API key contains control characters".into())),
        None => Ok(key),
    }
}

fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let secret = SECRET_QUERY_KEYS
                .iter()
                .any(|s| k.eq_ignore_ascii_case(s));
            let v = if secret { "<redacted>".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    (host_path, redacted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key("  \"ab c\n\" ").unwrap(), "abc");
        assert!(sanitize_api_key("   ").is_err());
        assert!(sanitize_api_key("clé").is_err());
    }

    #[test]
    fn error_messages_from_known_shapes() {
        let openai = br#"{"error":{"message":"bad key"}}"#;
        assert_eq!(extract_error_message_multi(openai), "bad key");

        let twitter = br#"{"errors":[{"detail":"duplicate content"}]}"#;
        assert_eq!(extract_error_message_multi(twitter), "duplicate content");

        let cohere = br#"{"message":"invalid api token"}"#;
        assert_eq!(extract_error_message_multi(cohere), "invalid api token");

        assert_eq!(extract_error_message_multi(b"plain text"), "plain text");
    }

    #[test]
    fn query_secrets_are_redacted() {
        let url = Url::parse("https://host.example/v1/x?api_key=s3cret&q=rust").unwrap();
        let (host_path, q) = redact_query(&url);
        assert_eq!(host_path, "host.example/v1/x");
        assert_eq!(
            q,
            vec![
                ("api_key".to_string(), "<redacted>".to_string()),
                ("q".to_string(), "rust".to_string())
            ]
        );
    }

    #[test]
    fn curl_never_contains_the_token() {
        let url = Url::parse("https://host.example/v1/x?token=abc").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        let curl = make_curl(&Method::POST, &url, &headers, Some(b"{}"));
        assert!(!curl.contains("abc"), "{curl}");
        assert!(curl.contains("<redacted>"));
    }

    #[test]
    fn snip_respects_char_boundaries() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= 503);
    }

    #[tokio::test]
    async fn post_json_sends_bearer_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header("authorization", "Bearer k-123"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hi"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&format!("{}/v1/", server.uri())).unwrap();
        let got: Value = client
            .post_json("chat", Some(" k-123 "), &json!({"message": "x"}))
            .await
            .unwrap();
        assert_eq!(got["text"], "hi");
    }

    #[tokio::test]
    async fn oauth_requests_carry_signed_header_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(query_param("dry_run", "1"))
            .and(header_regex("authorization", r#"^OAuth oauth_consumer_key="ck", .*oauth_signature=""#))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "1"}})))
            .expect(1)
            .mount(&server)
            .await;

        let creds = OAuth1Credentials::new("ck", "cs", "at", "as");
        let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
        let got: Value = client
            .post_json_opts(
                "2/tweets",
                &json!({"text": "hello"}),
                RequestOpts {
                    auth: Some(Auth::OAuth1(&creds)),
                    query: Some(vec![("dry_run", "1".into())]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(got["data"]["id"], "1");
    }

    #[tokio::test]
    async fn api_errors_surface_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("x-request-id", "req-9")
                    .set_body_json(json!({"errors": [{"title": "Too Many Requests"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
        let err = client
            .post_json::<_, Value>("2/tweets", None, &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        match err {
            HttpError::Api {
                message,
                request_id,
                ..
            } => {
                assert_eq!(message, "Too Many Requests");
                assert_eq!(request_id, "req-9");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_servers_hit_the_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"text": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(&format!("{}/", server.uri()))
            .unwrap()
            .with_timeout(Duration::from_millis(100));
        let err = client
            .post_json::<_, Value>("x", None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        #[derive(Debug, Deserialize)]
        struct Out {
            #[allow(dead_code)]
            text: String,
        }

        let client = HttpClient::new(&format!("{}/", server.uri())).unwrap();
        let err = client
            .post_json::<_, Out>("x", None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_, ref snip) if snip == "not json"));
    }
}
