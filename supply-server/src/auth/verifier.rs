//! Verifier implementations

use http::HeaderMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::{AuthVerifier, DEFAULT_USER_KEY, Principal};

pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Trusts an `X-User-Email` header. Development and demo deployments only.
pub struct HeaderVerifier;

impl AuthVerifier for HeaderVerifier {
    fn verify(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let user_key = headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USER_KEY);
        Ok(Principal::new(user_key))
    }

    fn name(&self) -> &'static str {
        "header"
    }
}

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
}

/// HS256 bearer tokens signed with a shared secret
pub struct JwtVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

impl AuthVerifier for JwtVerifier {
    fn verify(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let auth_header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
            })?;
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::with_message(ErrorCode::TokenInvalid, "Invalid Authorization format")
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {e}");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::new(ErrorCode::TokenExpired)
                    }
                    _ => AppError::invalid_token("Invalid or expired token"),
                }
            })?;

        // Email is the owner key when present so tokens and the header mode
        // address the same rows
        let claims = data.claims;
        Ok(Principal::new(claims.email.unwrap_or(claims.sub)))
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}

/// Sign a token for `sub`/`email` valid for `ttl_hours`
pub fn create_token(
    sub: &str,
    email: Option<&str>,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        email: email.map(str::to_string),
        exp: usize::try_from(exp).unwrap_or_default(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
