//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Optional `?q=<substring>&sort=name\|most\|least` |
//! | `POST`   | `/people` | Body: `{"name":"Ana"}` |
//! | `GET`    | `/people/:id` | Summary with case count; 404 if not found |
//! | `PUT`    | `/people/:id` | Body: `{"name":"Ana Silva"}` |
//! | `DELETE` | `/people/:id` | Cascades to the person's cases |
//! | `GET`    | `/people/:id/cases` | Linked case rows, newest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kokuhito_core::{
  directory::{self, SortKey},
  link::LinkedCase,
  person::{Person, PersonSummary},
  store::RecordStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `sort` values as the query string spells them; the original screen's
/// "Mais casos" / "Menos casos" dropdown plus the default name order.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortParam {
  Name,
  Most,
  Least,
}

impl From<SortParam> for SortKey {
  fn from(param: SortParam) -> Self {
    match param {
      SortParam::Name => SortKey::NameAscending,
      SortParam::Most => SortKey::CaseCountDescending,
      SortParam::Least => SortKey::CaseCountAscending,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q:    Option<String>,
  pub sort: Option<SortParam>,
}

/// `GET /people[?q=<substring>&sort=<key>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonSummary>>, ApiError>
where
  S: RecordStore,
{
  let mut people = directory::load_summaries(state.store.as_ref()).await?;
  if let Some(query) = &params.q {
    people = directory::filter_by_name(people, query);
  }
  if let Some(sort) = params.sort {
    people = directory::sort_by(people, sort.into());
  }
  Ok(Json(people))
}

// ─── Create / rename ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// `POST /people` — body: `{"name":"Ana"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let name = required_name(&body)?;
  let person = state
    .store
    .add_person(name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `PUT /people/:id` — body: `{"name":"Ana Silva"}`
pub async fn rename<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<NameBody>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  let name = required_name(&body)?;
  // Distinguish a missing row (404) from a backend failure (500).
  ensure_person_exists(&state, id).await?;
  state
    .store
    .rename_person(id, name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

fn required_name(body: &NameBody) -> Result<String, ApiError> {
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("required field missing: name".into()));
  }
  Ok(name.to_owned())
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /people/:id` — the person with their case count, which doubles as
/// the consequence preview before a delete.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonSummary>, ApiError>
where
  S: RecordStore,
{
  let person = ensure_person_exists(&state, id).await?;
  let cases = state
    .store
    .list_cases_for_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(PersonSummary { person, case_count: cases.len() }))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /people/:id` — irreversible; the store cascades to every case
/// naming this person. Confirmation happens client-side, informed by
/// `GET /people/:id`.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  ensure_person_exists(&state, id).await?;
  state
    .store
    .delete_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(%id, "person deleted (cases cascaded)");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Cases for one person ────────────────────────────────────────────────────

/// `GET /people/:id/cases` — linked rows touching this person, newest
/// first.
pub async fn cases_for<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<LinkedCase>>, ApiError>
where
  S: RecordStore,
{
  ensure_person_exists(&state, id).await?;
  let rows = state.cases().fetch_for_person(id).await?;
  Ok(Json(rows))
}

async fn ensure_person_exists<S>(
  state: &AppState<S>,
  id: Uuid,
) -> Result<Person, ApiError>
where
  S: RecordStore,
{
  state
    .store
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}
