//! Handler for `/stats` — the landing-screen aggregates.

use axum::{Json, extract::State};
use kokuhito_core::{stats::Stats, store::RecordStore};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /stats`
///
/// The two table reads are independent and order-insensitive, so they run
/// concurrently.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<Stats>, ApiError>
where
  S: RecordStore,
{
  let (cases, people) =
    tokio::join!(state.store.list_cases(), state.store.list_people());
  let cases = cases.map_err(|e| ApiError::Store(Box::new(e)))?;
  let people = people.map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(Stats::tally(&cases, people.len())))
}
