//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849).
//!
//! Twitter/X user-context writes (creating posts) are authorised with four
//! long-lived values: the app's consumer key/secret and the user's access
//! token/secret. Every request carries an `Authorization: OAuth ...` header
//! whose signature covers the method, the normalised URL and all query
//! parameters. JSON bodies are not part of the signature.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::{Method, Url};
use sha1::Sha1;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::HttpError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is; everything else is escaped.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// The four OAuth 1.0a user-context credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl OAuth1Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// Build the `Authorization` header value for a request, with a fresh
    /// nonce and the current timestamp. Query parameters already present on
    /// `url` are folded into the signature together with `extra_params`
    /// (form-encoded body fields, if any).
    pub fn authorization_header(
        &self,
        method: &Method,
        url: &Url,
        extra_params: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.authorization_header_with(method, url, extra_params, &nonce, timestamp)
    }

    /// Deterministic variant of [`Self::authorization_header`].
    pub fn authorization_header_with(
        &self,
        method: &Method,
        url: &Url,
        extra_params: &[(&str, &str)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String, HttpError> {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.sign(method, url, &oauth_params, extra_params)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn sign(
        &self,
        method: &Method,
        url: &Url,
        oauth_params: &[(&str, &str)],
        extra_params: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let base = signature_base_string(method, url, oauth_params, extra_params);
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| HttpError::Build(format!("oauth signing key rejected: {e}")))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, OAUTH_ENCODE).to_string()
}

/// `METHOD&enc(base_url)&enc(sorted params)` per RFC 5849 §3.4.1.
pub(crate) fn signature_base_string(
    method: &Method,
    url: &Url,
    oauth_params: &[(&str, &str)],
    extra_params: &[(&str, &str)],
) -> String {
    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .collect();
    pairs.extend(
        oauth_params
            .iter()
            .chain(extra_params.iter())
            .map(|(k, v)| (encode(k), encode(v))),
    );
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        encode(base_url.as_str()),
        encode(&param_string)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from Twitter's "Creating a signature" guide.
    fn doc_credentials() -> OAuth1Credentials {
        OAuth1Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    const DOC_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const DOC_TIMESTAMP: u64 = 1318622958;

    fn doc_url() -> Url {
        Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
            .unwrap()
    }

    #[test]
    fn matches_documented_signature() {
        let header = doc_credentials()
            .authorization_header_with(
                &Method::POST,
                &doc_url(),
                &[("status", "Hello Ladies + Gentlemen, a signed OAuth request!")],
                DOC_NONCE,
                DOC_TIMESTAMP,
            )
            .unwrap();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(
            header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""),
            "unexpected header: {header}"
        );
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn base_string_sorts_and_double_encodes() {
        let ts = DOC_TIMESTAMP.to_string();
        let oauth = [("oauth_nonce", DOC_NONCE), ("oauth_timestamp", ts.as_str())];
        let base = signature_base_string(&Method::POST, &doc_url(), &oauth, &[("status", "a b!")]);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\
             %26oauth_timestamp%3D1318622958%26status%3Da%2520b%2521"
        );
    }

    #[test]
    fn fresh_headers_use_distinct_nonces() {
        let creds = doc_credentials();
        let url = Url::parse("https://api.twitter.com/2/tweets").unwrap();
        let a = creds.authorization_header(&Method::POST, &url, &[]).unwrap();
        let b = creds.authorization_header(&Method::POST, &url, &[]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", doc_credentials());
        assert!(!rendered.contains("kAcSOqF21"));
        assert!(rendered.contains("<redacted>"));
    }
}
