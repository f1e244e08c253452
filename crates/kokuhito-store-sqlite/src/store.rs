//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kokuhito_core::{
  case::{Case, CaseUpdate, ValidCase},
  person::Person,
  store::RecordStore,
};

use crate::{
  Error, Result,
  encode::{
    CASE_COLUMNS, RawCase, RawPerson, case_from_row, encode_dt, encode_uuid,
    person_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kokuhito record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, created_at FROM people ORDER BY name ASC",
        )?;
        let rows = stmt
          .query_map([], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, created_at FROM people WHERE id = ?1",
              rusqlite::params![id_str],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_people_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Person>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let placeholders =
          vec!["?"; id_strs.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT id, name, created_at FROM people WHERE id IN ({placeholders})",
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs), person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn add_person(&self, name: String) -> Result<Person> {
    let person = Person { id: Uuid::new_v4(), name, created_at: Utc::now() };

    let id_str   = encode_uuid(person.id);
    let at_str   = encode_dt(person.created_at);
    let name_cpy = person.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_cpy, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn rename_person(&self, id: Uuid, name: String) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET name = ?2 WHERE id = ?1",
          rusqlite::params![id_str, name],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }
    Ok(())
  }

  async fn delete_person(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    // The schema's ON DELETE CASCADE removes the referencing cases.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }
    Ok(())
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn list_cases(&self) -> Result<Vec<Case>> {
    let raws: Vec<RawCase> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at DESC",
        ))?;
        let rows = stmt
          .query_map([], case_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn list_cases_for_person(&self, person_id: Uuid) -> Result<Vec<Case>> {
    let id_str = encode_uuid(person_id);

    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CASE_COLUMNS} FROM cases
           WHERE requester_id = ?1 OR related_person_id = ?1
           ORDER BY created_at DESC",
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], case_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1"),
              rusqlite::params![id_str],
              case_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn add_case(&self, input: ValidCase) -> Result<Case> {
    let now = Utc::now();
    let case = Case {
      id:                 Uuid::new_v4(),
      requester_id:       input.requester_id,
      related_person_id:  input.related_person_id,
      vision_1:           input.vision_1,
      vision_2:           input.vision_2,
      resolution_comment: input.resolution_comment,
      is_resolved:        input.is_resolved,
      created_at:         now,
      updated_at:         now,
    };

    let id_str        = encode_uuid(case.id);
    let requester_str = encode_uuid(case.requester_id);
    let related_str   = encode_uuid(case.related_person_id);
    let created_str   = encode_dt(case.created_at);
    let updated_str   = encode_dt(case.updated_at);
    let vision_1      = case.vision_1.clone();
    let vision_2      = case.vision_2.clone();
    let comment       = case.resolution_comment.clone();
    let is_resolved   = case.is_resolved;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cases (
             id, requester_id, related_person_id,
             vision_1, vision_2, resolution_comment,
             is_resolved, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            requester_str,
            related_str,
            vision_1,
            vision_2,
            comment,
            is_resolved,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(case)
  }

  async fn update_case(&self, id: Uuid, update: CaseUpdate) -> Result<()> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let CaseUpdate { vision_1, vision_2, resolution_comment, is_resolved } =
      update;

    // One transaction: bump updated_at (doubling as the existence check),
    // then apply each set field.
    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE cases SET updated_at = ?2 WHERE id = ?1",
          rusqlite::params![id_str, now_str],
        )?;
        if changed == 0 {
          return Ok(0);
        }

        if let Some(value) = vision_1 {
          tx.execute(
            "UPDATE cases SET vision_1 = ?2 WHERE id = ?1",
            rusqlite::params![id_str, value],
          )?;
        }
        if let Some(value) = vision_2 {
          tx.execute(
            "UPDATE cases SET vision_2 = ?2 WHERE id = ?1",
            rusqlite::params![id_str, value],
          )?;
        }
        if let Some(value) = resolution_comment {
          tx.execute(
            "UPDATE cases SET resolution_comment = ?2 WHERE id = ?1",
            rusqlite::params![id_str, value],
          )?;
        }
        if let Some(value) = is_resolved {
          tx.execute(
            "UPDATE cases SET is_resolved = ?2 WHERE id = ?1",
            rusqlite::params![id_str, value],
          )?;
        }

        tx.commit()?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CaseNotFound(id));
    }
    Ok(())
  }

  async fn delete_case(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM cases WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CaseNotFound(id));
    }
    Ok(())
  }
}
