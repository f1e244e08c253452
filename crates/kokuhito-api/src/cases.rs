//! Handlers for `/cases` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/cases` | Linked rows, newest first, split pending/resolved |
//! | `POST`   | `/cases` | Body: `NewCase`; 400 if a reference is missing |
//! | `GET`    | `/cases/:id` | One linked row; 404 if not found |
//! | `PATCH`  | `/cases/:id` | Body: `CaseUpdate`; absent fields untouched |
//! | `POST`   | `/cases/:id/resolve` | Shorthand for the common transition |
//! | `DELETE` | `/cases/:id` | Irreversible |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kokuhito_core::{
  case::{CaseUpdate, NewCase},
  link::{LinkedCase, partition},
  store::RecordStore,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// The two tabs of the cases screen in one response.
#[derive(Debug, Serialize)]
pub struct CaseTabs {
  pub pending:  Vec<LinkedCase>,
  pub resolved: Vec<LinkedCase>,
}

/// `GET /cases`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<CaseTabs>, ApiError>
where
  S: RecordStore,
{
  let rows = state.cases().fetch_all().await?;
  let (pending, resolved) = partition(rows);
  Ok(Json(CaseTabs { pending, resolved }))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /cases` — body: a [`NewCase`]. Missing person references fail
/// with 400 before the store sees anything.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(input): Json<NewCase>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = state.cases().create(input).await?;
  Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /cases/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<LinkedCase>, ApiError>
where
  S: RecordStore,
{
  let row = state.cases().fetch_one(id).await?;
  Ok(Json(row))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// `PATCH /cases/:id` — body: a [`CaseUpdate`]. `null` clears a text
/// field; an absent field is left alone.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(update): Json<CaseUpdate>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  ensure_case_exists(&state, id).await?;
  state.cases().update(id, update).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /cases/:id/resolve`
pub async fn resolve_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  ensure_case_exists(&state, id).await?;
  state.cases().mark_resolved(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /cases/:id` — no soft delete, no undo.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  ensure_case_exists(&state, id).await?;
  state.cases().delete(id).await?;
  tracing::info!(%id, "case deleted");
  Ok(StatusCode::NO_CONTENT)
}

async fn ensure_case_exists<S>(
  state: &AppState<S>,
  id: Uuid,
) -> Result<(), ApiError>
where
  S: RecordStore,
{
  state
    .store
    .get_case(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;
  Ok(())
}
