//! JSON REST API for Kokuhito.
//!
//! Exposes an axum [`Router`] backed by any
//! [`kokuhito_core::store::RecordStore`]. Every route sits behind the
//! shared-password gate in [`auth`]; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kokuhito_api::api_router(state.clone()))
//! ```

pub mod auth;
pub mod cases;
pub mod error;
pub mod people;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use kokuhito_core::{store::RecordStore, view::CaseView};

use auth::AuthConfig;

pub use error::ApiError;


// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), auth: Arc::clone(&self.auth) }
  }
}

impl<S: RecordStore> AppState<S> {
  pub fn new(store: S, auth: AuthConfig) -> Self {
    Self { store: Arc::new(store), auth: Arc::new(auth) }
  }

  /// A case view over this state's store handle.
  pub fn cases(&self) -> CaseView<Arc<S>> {
    CaseView::new(Arc::clone(&self.store))
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::rename::<S>)
        .delete(people::delete_one::<S>),
    )
    .route("/people/{id}/cases", get(people::cases_for::<S>))
    // Cases
    .route("/cases", get(cases::list::<S>).post(cases::create::<S>))
    .route(
      "/cases/{id}",
      get(cases::get_one::<S>)
        .patch(cases::update_one::<S>)
        .delete(cases::delete_one::<S>),
    )
    .route("/cases/{id}/resolve", post(cases::resolve_one::<S>))
    // Stats
    .route("/stats", get(stats::handler::<S>))
    .with_state(state)
}
