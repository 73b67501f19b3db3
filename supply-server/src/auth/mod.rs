//! Authentication boundary
//!
//! Every request passes through [`middleware::auth_middleware`], which asks
//! the configured [`AuthVerifier`] for a [`Principal`] and stores it in the
//! request extensions. Handlers scope all data by `Principal::user_key`.

pub mod middleware;
pub mod verifier;

use http::HeaderMap;
use shared::error::AppError;

pub use middleware::auth_middleware;
pub use verifier::{HeaderVerifier, JwtVerifier};

/// Owner key used when no identity header is supplied
pub const DEFAULT_USER_KEY: &str = "demo@example.com";

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_key: String,
}

impl Principal {
    pub fn new(user_key: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
        }
    }
}

/// Turns request headers into a principal or a 401
pub trait AuthVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Result<Principal, AppError>;

    /// Short label for the health endpoint and startup log
    fn name(&self) -> &'static str;
}
