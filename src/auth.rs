//! Bearer token extraction and role checks.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use std::future::{ready, Ready};
use thiserror::Error;

use crate::error::ApiError;

/// Errors raised while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Access denied for role '{role}'")]
    Forbidden { role: String },
}

/// Roles recognized by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Manager,
    Tenant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Tenant => "tenant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "custom:role", default)]
    role: Option<String>,
}

/// Caller identity taken from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub role: String,
}

impl AuthUser {
    /// Fail with [`AuthError::Forbidden`] unless the user has `role`
    pub fn require(&self, role: Role) -> Result<(), AuthError> {
        if self.role.eq_ignore_ascii_case(role.as_str()) {
            Ok(())
        } else {
            tracing::warn!(
                "Authorization failed: user {} has role '{}', required '{}'",
                self.id,
                self.role,
                role
            );
            Err(AuthError::Forbidden {
                role: self.role.clone(),
            })
        }
    }
}

/// Decodes bearer tokens into [`AuthUser`]s
pub struct TokenDecoder {
    key: DecodingKey,
    validation: Validation,
    verify: bool,
}

impl TokenDecoder {
    /// With a secret, HS256 signatures are verified. Without one the token
    /// is only decoded, for deployments where a gateway already verified it.
    pub fn new(secret: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let key = match secret {
            Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
            None => {
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        Self {
            key,
            validation,
            verify: secret.is_some(),
        }
    }

    pub fn verifies_signatures(&self) -> bool {
        self.verify
    }

    pub fn decode(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)?;

        Ok(AuthUser {
            id: data.claims.sub,
            role: data.claims.role.unwrap_or_default(),
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let decoder = req
        .app_data::<web::Data<TokenDecoder>>()
        .ok_or_else(|| ApiError::Internal("Token decoder is not configured".to_string()))?;

    let Some(token) = bearer_token(req) else {
        tracing::warn!(
            "Authentication failed: no token provided ({} {})",
            req.method(),
            req.path()
        );
        return Err(AuthError::MissingToken.into());
    };

    let user = decoder.decode(token).map_err(|e| {
        tracing::error!("Token validation failed ({} {}): {}", req.method(), req.path(), e);
        e
    })?;

    tracing::debug!("Authenticated user {} with role '{}'", user.id, user.role);
    Ok(user)
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
