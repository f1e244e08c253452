//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<kokuhito_core::Error> for ApiError {
  fn from(err: kokuhito_core::Error) -> Self {
    use kokuhito_core::Error;
    match err {
      Error::Validation(field) => {
        Self::BadRequest(format!("required field missing: {field}"))
      }
      Error::PersonNotFound(id) => {
        Self::NotFound(format!("person {id} not found"))
      }
      Error::CaseNotFound(id) => Self::NotFound(format!("case {id} not found")),
      Error::Store(inner) => Self::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        // Challenge so plain HTTP clients prompt for the password.
        return (
          StatusCode::UNAUTHORIZED,
          [(axum::http::header::WWW_AUTHENTICATE, "Basic realm=\"kokuhito\"")],
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
