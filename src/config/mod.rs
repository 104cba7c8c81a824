//! Environment-backed configuration.
//!
//! Server settings use `DOPPEL_*` variables. Provider settings keep their
//! conventional names: `{PROVIDER}_{CAPABILITY}_MODEL` for the model map and
//! `GOOGLE_API_KEY` / `OPENAI_API_KEY` / `DEEPSEEK_API_KEY` for credentials.

pub mod error;


pub use error::ConfigError;

use std::collections::BTreeMap;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_PROVIDER, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_PROVIDER_TIMEOUT_SECS,
    DEFAULT_REASONING_PROVIDER, DEFAULT_SIMILARITY_THRESHOLD, MODEL_KEY_SUFFIX,
};
use crate::provider::{Capability, EmbeddingProvider, ReasoningProvider};

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Cosine similarity cutoff in `[0, 1]`. Default: `0.85`.
    pub similarity_threshold: f64,

    /// Corpus fetch timeout. Default: 15 s.
    pub fetch_timeout: Duration,

    /// Per-call provider timeout. Default: 30 s.
    pub provider_timeout: Duration,

    /// Embedding provider used when a request omits one.
    pub default_embedding_provider: String,

    /// Reasoning provider used when a request omits one.
    pub default_reasoning_provider: String,

    /// `{PROVIDER}_{CAPABILITY}_MODEL` -> model identifier.
    pub models: BTreeMap<String, String>,

    /// Provider credentials.
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,

    /// Optional endpoint overrides (useful for proxies and tests).
    pub gemini_base_url: Option<String>,
    pub openai_base_url: Option<String>,

    /// Register deterministic stub backends instead of real providers.
    pub mock_providers: bool,

    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,

    /// Access token lifetime in hours. Default: `1`.
    pub jwt_expiration_hours: u64,

    /// The single administrative login.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    /// Allowed CORS origins; `["*"]` means any.
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(v: &Option<String>) -> &'static str {
            if v.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("provider_timeout", &self.provider_timeout)
            .field("default_embedding_provider", &self.default_embedding_provider)
            .field("default_reasoning_provider", &self.default_reasoning_provider)
            .field("models", &self.models)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("deepseek_api_key", &redact(&self.deepseek_api_key))
            .field("mock_providers", &self.mock_providers)
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("admin_username", &self.admin_username)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            default_embedding_provider: DEFAULT_EMBEDDING_PROVIDER.to_string(),
            default_reasoning_provider: DEFAULT_REASONING_PROVIDER.to_string(),
            models: BTreeMap::new(),
            google_api_key: None,
            openai_api_key: None,
            deepseek_api_key: None,
            gemini_base_url: None,
            openai_base_url: None,
            mock_providers: false,
            jwt_secret: None,
            jwt_expiration_hours: 1,
            admin_username: None,
            admin_password: None,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "DOPPEL_PORT";
    const ENV_BIND_ADDR: &'static str = "DOPPEL_BIND_ADDR";
    const ENV_THRESHOLD: &'static str = "SIMILARITY_THRESHOLD";
    const ENV_FETCH_TIMEOUT: &'static str = "DOPPEL_FETCH_TIMEOUT_SECS";
    const ENV_PROVIDER_TIMEOUT: &'static str = "DOPPEL_PROVIDER_TIMEOUT_SECS";
    const ENV_DEFAULT_EMBEDDING: &'static str = "DEFAULT_EMBEDDING_PROVIDER";
    const ENV_DEFAULT_REASONING: &'static str = "DEFAULT_REASONING_PROVIDER";
    const ENV_GOOGLE_API_KEY: &'static str = "GOOGLE_API_KEY";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_DEEPSEEK_API_KEY: &'static str = "DEEPSEEK_API_KEY";
    const ENV_GEMINI_BASE_URL: &'static str = "GEMINI_BASE_URL";
    const ENV_OPENAI_BASE_URL: &'static str = "OPENAI_BASE_URL";
    const ENV_MOCK_PROVIDERS: &'static str = "DOPPEL_MOCK_PROVIDERS";
    const ENV_JWT_SECRET: &'static str = "JWT_SECRET_KEY";
    const ENV_JWT_EXPIRATION: &'static str = "JWT_EXPIRATION_HOURS";
    const ENV_ADMIN_USERNAME: &'static str = "ADMIN_USERNAME";
    const ENV_ADMIN_PASSWORD: &'static str = "ADMIN_PASSWORD";
    const ENV_CORS_ORIGINS: &'static str = "CORS_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let similarity_threshold = Self::parse_threshold_from_env(defaults.similarity_threshold)?;
        let fetch_timeout = Self::parse_secs_from_env(Self::ENV_FETCH_TIMEOUT, defaults.fetch_timeout)?;
        let provider_timeout =
            Self::parse_secs_from_env(Self::ENV_PROVIDER_TIMEOUT, defaults.provider_timeout)?;
        let jwt_expiration_hours =
            Self::parse_positive_from_env(Self::ENV_JWT_EXPIRATION, defaults.jwt_expiration_hours)?;

        let cors_origins = Self::parse_optional_string_from_env(Self::ENV_CORS_ORIGINS)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Ok(Self {
            port,
            bind_addr,
            similarity_threshold,
            fetch_timeout,
            provider_timeout,
            default_embedding_provider: Self::parse_optional_string_from_env(
                Self::ENV_DEFAULT_EMBEDDING,
            )
            .unwrap_or(defaults.default_embedding_provider),
            default_reasoning_provider: Self::parse_optional_string_from_env(
                Self::ENV_DEFAULT_REASONING,
            )
            .unwrap_or(defaults.default_reasoning_provider),
            models: Self::collect_models(env::vars()),
            google_api_key: Self::parse_optional_string_from_env(Self::ENV_GOOGLE_API_KEY),
            openai_api_key: Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY),
            deepseek_api_key: Self::parse_optional_string_from_env(Self::ENV_DEEPSEEK_API_KEY),
            gemini_base_url: Self::parse_optional_string_from_env(Self::ENV_GEMINI_BASE_URL),
            openai_base_url: Self::parse_optional_string_from_env(Self::ENV_OPENAI_BASE_URL),
            mock_providers: Self::parse_optional_string_from_env(Self::ENV_MOCK_PROVIDERS).is_some(),
            jwt_secret: Self::parse_optional_string_from_env(Self::ENV_JWT_SECRET),
            jwt_expiration_hours,
            admin_username: Self::parse_optional_string_from_env(Self::ENV_ADMIN_USERNAME),
            admin_password: Self::parse_optional_string_from_env(Self::ENV_ADMIN_PASSWORD),
            cors_origins,
        })
    }

    /// Validates invariants that do not depend on the process environment.
    ///
    /// Missing model entries are not checked here: the resolver reports them
    /// per request, since only the providers actually requested need a model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.similarity_threshold,
            });
        }

        if self
            .default_embedding_provider
            .parse::<EmbeddingProvider>()
            .is_err()
        {
            return Err(ConfigError::UnsupportedDefaultProvider {
                capability: Capability::Embedding.as_str(),
                name: self.default_embedding_provider.clone(),
            });
        }

        if self
            .default_reasoning_provider
            .parse::<ReasoningProvider>()
            .is_err()
        {
            return Err(ConfigError::UnsupportedDefaultProvider {
                capability: Capability::Reasoning.as_str(),
                name: self.default_reasoning_provider.clone(),
            });
        }

        Ok(())
    }

    /// Like [`validate`](Self::validate), plus the settings only the HTTP server needs.
    pub fn validate_for_server(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.jwt_secret.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_JWT_SECRET,
            });
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Adds (or replaces) a model mapping. Mostly useful in tests and embedders.
    pub fn with_model(mut self, key: impl Into<String>, model: impl Into<String>) -> Self {
        self.models.insert(key.into(), model.into());
        self
    }

    fn collect_models<I>(vars: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let embedding_suffix = format!("_{}{}", Capability::Embedding.key_part(), MODEL_KEY_SUFFIX);
        let reasoning_suffix = format!("_{}{}", Capability::Reasoning.key_part(), MODEL_KEY_SUFFIX);

        vars.into_iter()
            .filter(|(key, _)| key.ends_with(&embedding_suffix) || key.ends_with(&reasoning_suffix))
            .map(|(key, value)| (key, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f64) -> Result<f64, ConfigError> {
        match env::var(Self::ENV_THRESHOLD) {
            Ok(value) => {
                let threshold: f64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::ThresholdParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if !(0.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidThreshold { value: threshold });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        Self::parse_positive_from_env(var_name, default.as_secs()).map(Duration::from_secs)
    }

    fn parse_positive_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
