//! CaseView — the read/mutate service for linked case rows.
//!
//! Wraps any [`RecordStore`] and exposes the operations the case screens
//! need: fetch everything (or one person's subset) as linked rows, create,
//! edit, resolve, delete. Every mutation either fully succeeds — after
//! which the caller refetches — or fully fails with the prior fetched
//! state untouched.

use uuid::Uuid;

use crate::{
  Error, Result,
  case::{CaseUpdate, NewCase},
  link::{LinkedCase, link},
  store::RecordStore,
};

/// Case operations over a store handle.
///
/// Cloning is as cheap as cloning the store handle itself.
#[derive(Debug, Clone)]
pub struct CaseView<S> {
  store: S,
}

impl<S: RecordStore> CaseView<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All cases as linked rows, newest first.
  ///
  /// Fetches the cases, then exactly the union of people they reference,
  /// then joins in memory.
  pub async fn fetch_all(&self) -> Result<Vec<LinkedCase>> {
    let cases = self.store.list_cases().await.map_err(Error::store)?;
    self.link_rows(cases).await
  }

  /// Linked rows restricted to cases touching one person, newest first.
  pub async fn fetch_for_person(
    &self,
    person_id: Uuid,
  ) -> Result<Vec<LinkedCase>> {
    let cases = self
      .store
      .list_cases_for_person(person_id)
      .await
      .map_err(Error::store)?;
    self.link_rows(cases).await
  }

  /// One case as a linked row, or `CaseNotFound`.
  pub async fn fetch_one(&self, id: Uuid) -> Result<LinkedCase> {
    let case = self
      .store
      .get_case(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CaseNotFound(id))?;
    let mut rows = self.link_rows(vec![case]).await?;
    Ok(rows.remove(0))
  }

  async fn link_rows(
    &self,
    cases: Vec<crate::case::Case>,
  ) -> Result<Vec<LinkedCase>> {
    let mut ids: Vec<Uuid> = cases
      .iter()
      .flat_map(|c| [c.requester_id, c.related_person_id])
      .collect();
    ids.sort_unstable();
    ids.dedup();

    let people = self
      .store
      .get_people_by_ids(&ids)
      .await
      .map_err(Error::store)?;
    Ok(link(cases, people))
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Validate and insert a new case, returning its store-assigned id.
  ///
  /// Validation happens before any store call: a missing reference fails
  /// with [`Error::Validation`] and the store never sees the attempt.
  pub async fn create(&self, input: NewCase) -> Result<Uuid> {
    let valid = input.validate()?;
    let case = self.store.add_case(valid).await.map_err(Error::store)?;
    Ok(case.id)
  }

  /// Apply a partial edit. Blank text in set fields clears the column.
  pub async fn update(&self, id: Uuid, update: CaseUpdate) -> Result<()> {
    self
      .store
      .update_case(id, update.normalized())
      .await
      .map_err(Error::store)
  }

  /// The single most common transition, exposed without the full edit
  /// form: flip `is_resolved` to true.
  pub async fn mark_resolved(&self, id: Uuid) -> Result<()> {
    self.update(id, CaseUpdate::resolved(true)).await
  }

  /// Irreversible. Confirmation (and the affected-count preview for
  /// person deletion) is the caller's responsibility.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.store.delete_case(id).await.map_err(Error::store)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    case::{Case, CaseUpdate, NewCase, ValidCase},
    link::PersonRef,
    person::Person,
    store::RecordStore,
  };

  /// In-memory store that counts every call — lets the tests prove that
  /// validation failures never reach the backend.
  #[derive(Default)]
  struct MockStore {
    people: Mutex<Vec<Person>>,
    cases:  Mutex<Vec<Case>>,
    calls:  AtomicUsize,
  }

  #[derive(Debug, thiserror::Error)]
  #[error("mock store failure")]
  struct MockError;

  impl MockStore {
    fn tick(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }

    fn call_count(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    fn add_person_named(&self, name: &str) -> Person {
      let person = Person {
        id: Uuid::new_v4(),
        name: name.into(),
        created_at: Utc::now(),
      };
      self.people.lock().unwrap().push(person.clone());
      person
    }
  }

  impl RecordStore for MockStore {
    type Error = MockError;

    async fn list_people(&self) -> Result<Vec<Person>, MockError> {
      self.tick();
      Ok(self.people.lock().unwrap().clone())
    }

    async fn get_person(&self, id: Uuid) -> Result<Option<Person>, MockError> {
      self.tick();
      Ok(self.people.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn get_people_by_ids(
      &self,
      ids: &[Uuid],
    ) -> Result<Vec<Person>, MockError> {
      self.tick();
      Ok(
        self
          .people
          .lock()
          .unwrap()
          .iter()
          .filter(|p| ids.contains(&p.id))
          .cloned()
          .collect(),
      )
    }

    async fn add_person(&self, name: String) -> Result<Person, MockError> {
      self.tick();
      Ok(self.add_person_named(&name))
    }

    async fn rename_person(
      &self,
      id: Uuid,
      name: String,
    ) -> Result<(), MockError> {
      self.tick();
      let mut people = self.people.lock().unwrap();
      let person =
        people.iter_mut().find(|p| p.id == id).ok_or(MockError)?;
      person.name = name;
      Ok(())
    }

    async fn delete_person(&self, id: Uuid) -> Result<(), MockError> {
      self.tick();
      self.people.lock().unwrap().retain(|p| p.id != id);
      // Cascade, as the real store's schema does.
      self
        .cases
        .lock()
        .unwrap()
        .retain(|c| c.requester_id != id && c.related_person_id != id);
      Ok(())
    }

    async fn list_cases(&self) -> Result<Vec<Case>, MockError> {
      self.tick();
      let mut cases = self.cases.lock().unwrap().clone();
      cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      Ok(cases)
    }

    async fn list_cases_for_person(
      &self,
      person_id: Uuid,
    ) -> Result<Vec<Case>, MockError> {
      self.tick();
      let mut cases: Vec<Case> = self
        .cases
        .lock()
        .unwrap()
        .iter()
        .filter(|c| {
          c.requester_id == person_id || c.related_person_id == person_id
        })
        .cloned()
        .collect();
      cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      Ok(cases)
    }

    async fn get_case(&self, id: Uuid) -> Result<Option<Case>, MockError> {
      self.tick();
      Ok(self.cases.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn add_case(&self, input: ValidCase) -> Result<Case, MockError> {
      self.tick();
      let now = Utc::now();
      let case = Case {
        id: Uuid::new_v4(),
        requester_id: input.requester_id,
        related_person_id: input.related_person_id,
        vision_1: input.vision_1,
        vision_2: input.vision_2,
        resolution_comment: input.resolution_comment,
        is_resolved: input.is_resolved,
        created_at: now,
        updated_at: now,
      };
      self.cases.lock().unwrap().push(case.clone());
      Ok(case)
    }

    async fn update_case(
      &self,
      id: Uuid,
      update: CaseUpdate,
    ) -> Result<(), MockError> {
      self.tick();
      let mut cases = self.cases.lock().unwrap();
      let case = cases.iter_mut().find(|c| c.id == id).ok_or(MockError)?;
      if let Some(v) = update.vision_1 {
        case.vision_1 = v;
      }
      if let Some(v) = update.vision_2 {
        case.vision_2 = v;
      }
      if let Some(v) = update.resolution_comment {
        case.resolution_comment = v;
      }
      if let Some(v) = update.is_resolved {
        case.is_resolved = v;
      }
      case.updated_at = Utc::now();
      Ok(())
    }

    async fn delete_case(&self, id: Uuid) -> Result<(), MockError> {
      self.tick();
      let mut cases = self.cases.lock().unwrap();
      if !cases.iter().any(|c| c.id == id) {
        return Err(MockError);
      }
      cases.retain(|c| c.id != id);
      Ok(())
    }
  }

  fn new_case(requester: &Person, related: &Person) -> NewCase {
    NewCase {
      requester_id: Some(requester.id),
      related_person_id: Some(related.id),
      ..NewCase::default()
    }
  }

  #[tokio::test]
  async fn create_without_requester_never_touches_the_store() {
    let view = CaseView::new(MockStore::default());
    let input = NewCase {
      related_person_id: Some(Uuid::new_v4()),
      ..NewCase::default()
    };

    let err = view.create(input).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(view.store().call_count(), 0);
  }

  #[tokio::test]
  async fn created_case_shows_up_linked_and_pending() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let beto = view.store().add_person_named("Beto");

    let id = view.create(new_case(&ana, &beto)).await.unwrap();

    let rows = view.fetch_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].case.id, id);
    assert!(!rows[0].case.is_resolved);
    assert_eq!(rows[0].requester, PersonRef::Known(ana));
    assert_eq!(rows[0].related_person, PersonRef::Known(beto));

    let (pending, resolved) = crate::link::partition(rows);
    assert_eq!(pending.len(), 1);
    assert!(resolved.is_empty());
  }

  #[tokio::test]
  async fn mark_resolved_moves_the_case_across_the_partition() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let beto = view.store().add_person_named("Beto");
    let id = view.create(new_case(&ana, &beto)).await.unwrap();

    view.mark_resolved(id).await.unwrap();

    let rows = view.fetch_all().await.unwrap();
    assert!(rows[0].case.is_resolved);
    let (pending, resolved) = crate::link::partition(rows);
    assert!(pending.is_empty());
    assert_eq!(resolved.len(), 1);
  }

  #[tokio::test]
  async fn update_can_reopen_a_resolved_case() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let id = view.create(new_case(&ana, &ana)).await.unwrap();

    view.mark_resolved(id).await.unwrap();
    view.update(id, CaseUpdate::resolved(false)).await.unwrap();

    let row = view.fetch_one(id).await.unwrap();
    assert!(!row.case.is_resolved);
  }

  #[tokio::test]
  async fn update_applies_only_the_set_fields() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let input = NewCase {
      vision_1: Some("first".into()),
      ..new_case(&ana, &ana)
    };
    let id = view.create(input).await.unwrap();

    let update = CaseUpdate {
      resolution_comment: Some(Some("talked it out".into())),
      ..CaseUpdate::default()
    };
    view.update(id, update).await.unwrap();

    let row = view.fetch_one(id).await.unwrap();
    assert_eq!(row.case.vision_1.as_deref(), Some("first"));
    assert_eq!(row.case.resolution_comment.as_deref(), Some("talked it out"));
  }

  #[tokio::test]
  async fn deleting_a_person_cascades_to_their_cases() {
    let view = CaseView::new(MockStore::default());
    let x = view.store().add_person_named("X");
    let other = view.store().add_person_named("Other");
    view.create(new_case(&x, &other)).await.unwrap();
    view.create(new_case(&other, &x)).await.unwrap();

    view.store().delete_person(x.id).await.unwrap();

    assert!(view.fetch_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn fetch_for_person_sees_both_sides() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let beto = view.store().add_person_named("Beto");
    let carla = view.store().add_person_named("Carla");
    view.create(new_case(&ana, &beto)).await.unwrap();
    view.create(new_case(&carla, &ana)).await.unwrap();
    view.create(new_case(&beto, &carla)).await.unwrap();

    let rows = view.fetch_for_person(ana.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(
      rows
        .iter()
        .all(|r| r.requester.id() == ana.id || r.related_person.id() == ana.id)
    );
  }

  #[tokio::test]
  async fn directory_loads_summaries_from_the_store() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let beto = view.store().add_person_named("Beto");
    view.create(new_case(&ana, &beto)).await.unwrap();

    let all = crate::directory::load_all(view.store()).await.unwrap();
    assert_eq!(all.len(), 2);

    let summaries =
      crate::directory::load_summaries(view.store()).await.unwrap();
    assert!(summaries.iter().all(|s| s.case_count == 1));
  }

  #[tokio::test]
  async fn delete_case_then_fetch_one_is_not_found() {
    let view = CaseView::new(MockStore::default());
    let ana = view.store().add_person_named("Ana");
    let id = view.create(new_case(&ana, &ana)).await.unwrap();

    view.delete(id).await.unwrap();

    let err = view.fetch_one(id).await.unwrap_err();
    assert!(matches!(err, Error::CaseNotFound(missing) if missing == id));
  }
}
