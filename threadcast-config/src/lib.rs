//! Loader for Threadcast configuration: built-in defaults, optional YAML
//! files, `THREADCAST__`-prefixed environment overrides and `${VAR}`
//! expansion.
//!
//! Precedence, lowest first: built-in defaults, files in the order they were
//! added, inline YAML snippets, `THREADCAST__SECTION__KEY` variables, then the
//! port variable named with [`ThreadcastConfigLoader::with_port_env`].
//!
//! The built-in defaults read credentials from the environment names used by
//! existing deployments (`Cohere_key`, `API_K`, `API_SEC`, `ACCESS_TKN`,
//! `ACCESS_SEC`). Unset credentials are not an error at load time; call
//! [`ThreadcastConfig::missing_credentials`] to report them.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use threadcast_llm::{cohere::COHERE_API_BASE, openai::OPENAI_API_BASE};
use threadcast_llm::{DEFAULT_COHERE_MODEL, DEFAULT_TEMPERATURE};

const MAX_EXPANSION_ROUNDS: usize = 8;

pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_POST_DELAY_MS: u64 = 2000;

const DEFAULTS_YAML: &str = r#"
server:
  host: "0.0.0.0"
  port: 7860
llm:
  provider: cohere
  auth_token: "${Cohere_key}"
twitter:
  consumer_key: "${API_K}"
  consumer_secret: "${API_SEC}"
  access_token: "${ACCESS_TKN}"
  access_token_secret: "${ACCESS_SEC}"
  post_delay_ms: 2000
"#;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThreadcastConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "number_or_string")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Cohere {
        #[serde(default = "default_cohere_model")]
        model: String,
        auth_token: String,
        #[serde(default = "default_temperature", deserialize_with = "number_or_string")]
        temperature: f32,
        #[serde(default = "default_cohere_endpoint")]
        endpoint: String,
    },
    Openai {
        model: String,
        auth_token: String,
        #[serde(default = "default_temperature", deserialize_with = "number_or_string")]
        temperature: f32,
        #[serde(default = "default_openai_endpoint")]
        endpoint: String,
    },
}

impl LlmConfig {
    pub fn temperature(&self) -> f32 {
        match self {
            LlmConfig::Cohere { temperature, .. } | LlmConfig::Openai { temperature, .. } => {
                *temperature
            }
        }
    }

    fn auth_token(&self) -> &str {
        match self {
            LlmConfig::Cohere { auth_token, .. } | LlmConfig::Openai { auth_token, .. } => {
                auth_token
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    #[serde(default = "default_post_delay_ms", deserialize_with = "number_or_string")]
    pub post_delay_ms: u64,
    #[serde(default = "default_twitter_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_status_url_base")]
    pub status_url_base: String,
}

impl ThreadcastConfig {
    /// Credential fields that are empty or still hold an unexpanded `${VAR}`.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let checks = [
            ("llm.auth_token", self.llm.auth_token()),
            ("twitter.consumer_key", self.twitter.consumer_key.as_str()),
            ("twitter.consumer_secret", self.twitter.consumer_secret.as_str()),
            ("twitter.access_token", self.twitter.access_token.as_str()),
            (
                "twitter.access_token_secret",
                self.twitter.access_token_secret.as_str(),
            ),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| is_unset(value))
            .map(|(name, _)| name)
            .collect()
    }
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.contains("${")
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_post_delay_ms() -> u64 {
    DEFAULT_POST_DELAY_MS
}
fn default_cohere_model() -> String {
    DEFAULT_COHERE_MODEL.into()
}
fn default_cohere_endpoint() -> String {
    COHERE_API_BASE.into()
}
fn default_openai_endpoint() -> String {
    OPENAI_API_BASE.into()
}
fn default_twitter_endpoint() -> String {
    "https://api.twitter.com/".into()
}
fn default_status_url_base() -> String {
    "https://twitter.com/user/status/".into()
}

/// Environment overrides always arrive as strings; accept both forms.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}

fn expand_placeholders(value: &mut Value) {
    match value {
        Value::String(s) if s.contains("${") => *s = expand_str(s),
        Value::Array(items) => items.iter_mut().for_each(expand_placeholders),
        Value::Object(map) => map.values_mut().for_each(expand_placeholders),
        _ => {}
    }
}

/// Expand `${VAR}` until the text stops changing, since a value may itself
/// reference other variables. Unknown names and bare `$` stay literal.
fn expand_str(raw: &str) -> String {
    let mut current = raw.to_string();
    for _ in 0..MAX_EXPANSION_ROUNDS {
        let next = expand_braced(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One pass over the `${...}` spans of `text`; everything between them is
/// copied untouched.
fn expand_braced(text: &str) -> String {
    let lookup = |name: &str| std::env::var(name).ok();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len + 1;
        out.push_str(&rest[..start]);
        out.push_str(&shellexpand::env_with_context_no_errors(&rest[start..end], lookup));
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Load variables from a `.env` file in the working directory, if present.
/// Variables already set in the process environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Builder hiding the `config` crate wiring.
pub struct ThreadcastConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    snippets: Vec<String>,
    port_env: Option<String>,
}

impl Default for ThreadcastConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadcastConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use threadcast_config::{ThreadcastConfigLoader, DEFAULT_PORT};
    ///
    /// let config = ThreadcastConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.server.port, DEFAULT_PORT);
    /// assert_eq!(config.twitter.post_delay_ms, 2000);
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self {
            builder,
            snippets: Vec::new(),
            port_env: None,
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred from
    /// the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent, so headless
    /// deployments can rely purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    ///
    /// ```
    /// use threadcast_config::{LlmConfig, ThreadcastConfigLoader};
    ///
    /// let cfg = ThreadcastConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: openai
    ///   model: gpt-4o-mini
    ///   auth_token: sk-test
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(matches!(cfg.llm, LlmConfig::Openai { ref model, .. } if model == "gpt-4o-mini"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.snippets.push(yaml.to_string());
        self
    }

    /// Let an environment variable (usually `PORT`) override `server.port`.
    /// A value that is not a valid port is logged and ignored.
    pub fn with_port_env(mut self, name: &str) -> Self {
        self.port_env = Some(name.to_string());
        self
    }

    /// Merge every source, expand `${VAR}` placeholders and deserialize.
    pub fn load(self) -> Result<ThreadcastConfig, ConfigError> {
        let mut builder = self.builder;
        for snippet in &self.snippets {
            builder = builder.add_source(File::from_str(snippet, FileFormat::Yaml));
        }
        builder = builder.add_source(Environment::with_prefix("THREADCAST").separator("__"));

        if let Some(name) = &self.port_env {
            if let Ok(raw) = std::env::var(name) {
                match raw.trim().parse::<u16>() {
                    Ok(port) => builder = builder.set_override("server.port", i64::from(port))?,
                    Err(e) => tracing::warn!(var = %name, value = %raw, "ignoring invalid port: {e}"),
                }
            }
        }

        let cfg = builder.build()?;
        let mut v: Value = cfg.try_deserialize()?;
        expand_placeholders(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
