//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `kokuhito-store-sqlite`). Higher layers (`kokuhito-api`, the view
//! services in this crate) depend on this abstraction, not on any concrete
//! backend.
//!
//! Ownership contract: the store holds the authoritative copy of every
//! person and case. Callers receive owned snapshots, never live views, and
//! refetch after each successful mutation instead of patching locally.

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{Case, CaseUpdate, ValidCase},
  person::Person,
};

/// Abstraction over a Kokuhito record store backend.
///
/// Ids and timestamps are always assigned by the store. Deleting a person
/// cascades to every case referencing them as requester or related person;
/// that invariant lives in the store, not in callers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// All people, ordered by name ascending.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// The "id in a set" select used when linking cases. Missing ids are
  /// simply absent from the result; order is unspecified.
  fn get_people_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Create and persist a person; id and `created_at` are store-assigned.
  fn add_person(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Rename an existing person. Fails if the id is not found.
  fn rename_person(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a person and, by cascade, every case referencing them. Fails
  /// if the id is not found.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// All cases, ordered by `created_at` descending (newest first).
  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Cases where `person_id` appears as requester or related person,
  /// ordered by `created_at` descending.
  fn list_cases_for_person(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Retrieve a case by id. Returns `None` if not found.
  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Insert a validated case; id and both timestamps are store-assigned.
  fn add_case(
    &self,
    input: ValidCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Apply the set fields of `update` and bump `updated_at`. Fails if the
  /// id is not found.
  fn update_case(
    &self,
    id: Uuid,
    update: CaseUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a case. Fails if the id is not found.
  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Shared handles delegate, so services can hold an `Arc<S>` and stay
/// cheaply cloneable.
impl<T: RecordStore> RecordStore for std::sync::Arc<T> {
  type Error = T::Error;

  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_ {
    T::list_people(self)
  }

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_
  {
    T::get_person(self, id)
  }

  fn get_people_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a {
    T::get_people_by_ids(self, ids)
  }

  fn add_person(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_ {
    T::add_person(self, name)
  }

  fn rename_person(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    T::rename_person(self, id, name)
  }

  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    T::delete_person(self, id)
  }

  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_ {
    T::list_cases(self)
  }

  fn list_cases_for_person(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_ {
    T::list_cases_for_person(self, person_id)
  }

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_ {
    T::get_case(self, id)
  }

  fn add_case(
    &self,
    input: ValidCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_ {
    T::add_case(self, input)
  }

  fn update_case(
    &self,
    id: Uuid,
    update: CaseUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    T::update_case(self, id, update)
  }

  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    T::delete_case(self, id)
  }
}
