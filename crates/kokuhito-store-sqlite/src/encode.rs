//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings, booleans as integers (rusqlite's native mapping).

use chrono::{DateTime, Utc};
use kokuhito_core::{case::Case, person::Person};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub id:         String,
  pub name:       String,
  pub created_at: String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `cases` row.
pub struct RawCase {
  pub id:                 String,
  pub requester_id:       String,
  pub related_person_id:  String,
  pub vision_1:           Option<String>,
  pub vision_2:           Option<String>,
  pub resolution_comment: Option<String>,
  pub is_resolved:        bool,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      id:                 decode_uuid(&self.id)?,
      requester_id:       decode_uuid(&self.requester_id)?,
      related_person_id:  decode_uuid(&self.related_person_id)?,
      vision_1:           self.vision_1,
      vision_2:           self.vision_2,
      resolution_comment: self.resolution_comment,
      is_resolved:        self.is_resolved,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list and row mapper shared by every `cases` select.
pub const CASE_COLUMNS: &str = "id, requester_id, related_person_id, \
   vision_1, vision_2, resolution_comment, is_resolved, \
   created_at, updated_at";

pub fn case_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCase> {
  Ok(RawCase {
    id:                 row.get(0)?,
    requester_id:       row.get(1)?,
    related_person_id:  row.get(2)?,
    vision_1:           row.get(3)?,
    vision_2:           row.get(4)?,
    resolution_comment: row.get(5)?,
    is_resolved:        row.get(6)?,
    created_at:         row.get(7)?,
    updated_at:         row.get(8)?,
  })
}

pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id:         row.get(0)?,
    name:       row.get(1)?,
    created_at: row.get(2)?,
  })
}
