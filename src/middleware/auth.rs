// SPDX-License-Identifier: MIT

//! JWT session validation middleware.
//!
//! Tokens are issued by the campus identity service; this middleware
//! only validates them and extracts the caller's identity. Issuance is
//! out of scope here.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Whether the caller may review completions
    #[serde(default)]
    pub admin: bool,
}

/// Authenticated caller extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub is_admin: bool,
}

/// Middleware that requires a valid session token.
///
/// Failures reply with the same JSON error body every other path emits,
/// not a bare status line.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get("ecotrack_token") {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Unauthorized),
        }
    };

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::Unauthorized)?;

    let user_id: u64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let auth_user = AuthUser {
        user_id,
        is_admin: token_data.claims.admin,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a session JWT. Used by tests; production tokens come from the
/// identity service.
pub fn create_jwt(user_id: u64, is_admin: bool, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 24 * 60 * 60, // 1 day
        admin: is_admin,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
