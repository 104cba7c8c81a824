//! Access tokens for the protected routes.
//!
//! A single administrative credential is exchanged at `/login` for an HS256
//! token; `/check_similarity` and `/group_similar_questions` require it as a
//! bearer token.

use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

use doppel::{Config, ConfigError};

use super::error::GatewayError;
use super::state::HandlerState;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and verifies access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    admin: Option<(String, String)>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .field("admin", &self.admin.as_ref().map(|(user, _)| user))
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            admin: None,
        }
    }

    pub fn with_admin(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin = Some((username.into(), password.into()));
        self
    }

    /// Builds the service from `JWT_SECRET_KEY`, `JWT_EXPIRATION_HOURS` and
    /// the admin credential. Without both admin fields every login fails.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let secret = config
            .jwt_secret
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: "JWT_SECRET_KEY",
            })?;

        let lifetime = Duration::from_secs(config.jwt_expiration_hours.saturating_mul(3600));
        let service = Self::new(secret, lifetime);

        Ok(match (&config.admin_username, &config.admin_password) {
            (Some(user), Some(pass)) => service.with_admin(user.clone(), pass.clone()),
            _ => service,
        })
    }

    /// Checks the credential in constant time and issues a token on success.
    pub fn login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let Some((expected_user, expected_pass)) = &self.admin else {
            debug!("Login attempted with no admin credential configured");
            return Err(GatewayError::BadCredentials);
        };

        let user_ok = username.as_bytes().ct_eq(expected_user.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(expected_pass.as_bytes());

        if bool::from(user_ok & pass_ok) {
            self.issue(username)
        } else {
            Err(GatewayError::BadCredentials)
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, GatewayError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(self.lifetime.as_secs()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| GatewayError::InternalError(format!("token signing failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, GatewayError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                GatewayError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

/// The verified subject of a bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<HandlerState> for AuthenticatedUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &HandlerState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|val| val.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GatewayError::Unauthorized("Missing Authorization Header".to_string()))?;

        state.tokens.verify(token).map(AuthenticatedUser)
    }
}
