use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::errors::AppError;
use crate::handlers::AppState;

/// Header carrying the shared secret for `POST /lead`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `x-api-key` does not match the configured key.
///
/// Runs before the body is read, so a rejected request never reaches Salesforce.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    validate_api_key(&state.config.api_key, request.headers())?;
    Ok(next.run(request).await)
}

/// Validate API key from the `x-api-key` header.
fn validate_api_key(expected: &str, headers: &HeaderMap) -> Result<(), AppError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Forbidden)?;

    if !keys_match(provided, expected) {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

/// Compares two keys in constant time.
///
/// Both sides are hashed first so the comparison length does not depend on
/// the key length.
fn keys_match(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
