//! Authentication context extraction
//!
//! Resolves the calling [`Principal`] from an `Authorization: Bearer <jwt>`
//! header. Requests without the header are served as the anonymous principal.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use history_engine::Principal;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::HistoryServer;

/// Authentication context of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub principal: Principal,
}

impl AuthContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn anonymous() -> Self {
        Self::new(Principal::anonymous())
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

/// Token subject: a numeric user id, or the same id as a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenSubject {
    Id(i64),
    Text(String),
}

impl TokenSubject {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            TokenSubject::Id(id) => Some(*id),
            TokenSubject::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<i64> for TokenSubject {
    fn from(id: i64) -> Self {
        TokenSubject::Id(id)
    }
}

/// JWT claims accepted by the history API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: TokenSubject,
    #[serde(default)]
    pub is_superuser: bool,
    pub exp: i64,
}

/// Validates HS256 bearer tokens
#[derive(Clone)]
pub struct TokenVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl TokenVerifier {
    /// Without a secret every token is rejected.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate `token` and resolve the principal it names.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for a bad signature, an expired
    /// token, or a non-numeric subject.
    pub fn verify(&self, token: &str) -> Result<Principal, ApiError> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| ApiError::authentication("Bearer tokens are not accepted by this server"))?;

        let data = decode::<JwtClaims>(token, key, &self.validation)
            .map_err(|e| ApiError::authentication(format!("Invalid token: {e}")))?;

        let user_id = data
            .claims
            .sub
            .user_id()
            .ok_or_else(|| ApiError::authentication("Invalid token subject"))?;

        Ok(Principal {
            user_id: Some(user_id),
            is_superuser: data.claims.is_superuser,
        })
    }
}

/// Extract the bearer token, `Ok(None)` when no Authorization header is sent.
fn extract_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::authentication("Invalid Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| ApiError::authentication("Invalid Authorization header format. Expected: Bearer <token>"))
}

#[async_trait]
impl FromRequestParts<HistoryServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, server: &HistoryServer) -> Result<Self, Self::Rejection> {
        match extract_token(parts)? {
            Some(token) => Ok(AuthContext::new(server.tokens.verify(token)?)),
            None => Ok(AuthContext::anonymous()),
        }
    }
}
