use std::sync::Arc;

use doppel::{Config, ConfigError, DuplicateDetector};

use super::auth::TokenService;
use super::rate_limit::RateLimits;

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct HandlerState {
    pub detector: Arc<DuplicateDetector>,
    pub tokens: Arc<TokenService>,
    pub limits: Arc<RateLimits>,
    pub cors_origins: Vec<String>,
}

impl HandlerState {
    pub fn new(detector: Arc<DuplicateDetector>, tokens: Arc<TokenService>) -> Self {
        Self {
            detector,
            tokens,
            limits: Arc::new(RateLimits::default()),
            cors_origins: vec!["*".to_string()],
        }
    }

    pub fn from_config(config: &Config, detector: Arc<DuplicateDetector>) -> Result<Self, ConfigError> {
        let tokens = TokenService::from_config(config)?;
        Ok(Self::new(detector, Arc::new(tokens)).with_cors_origins(config.cors_origins.clone()))
    }

    pub fn with_limits(mut self, limits: RateLimits) -> Self {
        self.limits = Arc::new(limits);
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}
