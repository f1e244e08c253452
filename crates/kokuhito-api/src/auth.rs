//! The shared-password gate, as an HTTP Basic-auth extractor.
//!
//! This is a single-tenant tool with one secret: the password. The Basic
//! username is accepted but ignored. The password is verified against an
//! argon2 PHC hash so the config file never holds it in the clear.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use kokuhito_core::store::RecordStore;

use crate::{AppState, error::ApiError};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the request carried the
/// shared password.
pub struct Authenticated;

/// Verify the password directly from headers.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded)
    .map_err(|_| ApiError::Unauthorized)?;

  // Username before the colon is ignored; only the password matters.
  let (_, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: RecordStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Authenticated)
  }
}

/// Hash a plaintext password into the PHC string the config file expects.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use rand_core::OsRng;

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("hashing password: {e}"))?;
  Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
  use axum::http::{Request, header};

  use super::*;
  use crate::tests::{basic_auth, test_state};

  async fn extract(
    req: Request<axum::body::Body>,
  ) -> Result<Authenticated, ApiError> {
    let state = test_state("secret").await;
    let (mut parts, _) = req.into_parts();
    Authenticated::from_request_parts(&mut parts, &state).await
  }

  #[tokio::test]
  async fn correct_password_passes() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic_auth("anyone", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(extract(req).await.is_ok());
  }

  #[tokio::test]
  async fn username_is_ignored() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic_auth("someone-else", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(extract(req).await.is_ok());
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic_auth("anyone", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header_is_rejected() {
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64_is_rejected() {
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized)));
  }
}
