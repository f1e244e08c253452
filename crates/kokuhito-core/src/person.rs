//! Person — a named individual who can file or be the subject of cases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered person. `id` and `created_at` are assigned by the store on
/// insert; `name` is non-empty (enforced at the mutation boundary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// A person annotated with their derived case count — the number of cases
/// in which they appear as requester or related person. Never stored;
/// recomputed from the case table on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
  #[serde(flatten)]
  pub person:     Person,
  pub case_count: usize,
}
