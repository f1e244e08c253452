//! CaseLinker — joining case rows to the people they reference.
//!
//! Pure functions: no I/O, no mutation of inputs. The person lookup map is
//! built over exactly the ids the input cases reference, so a partial
//! person set is fine and the map never grows with the person table.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{case::Case, person::Person};

/// Display name used when a case references a person that no longer
/// exists. Kept in the original product's copy.
pub const UNKNOWN_PERSON: &str = "Desconhecido";

// ─── PersonRef ───────────────────────────────────────────────────────────────

/// A resolved person reference on a linked case.
///
/// A dangling reference must never block rendering the rest of the case,
/// so it resolves to [`PersonRef::Unknown`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonRef {
  Known(Person),
  Unknown { id: Uuid },
}

impl PersonRef {
  pub fn display_name(&self) -> &str {
    match self {
      Self::Known(person) => &person.name,
      Self::Unknown { .. } => UNKNOWN_PERSON,
    }
  }

  pub fn id(&self) -> Uuid {
    match self {
      Self::Known(person) => person.id,
      Self::Unknown { id } => *id,
    }
  }
}

// ─── LinkedCase ──────────────────────────────────────────────────────────────

/// A case enriched with its resolved person references — the denormalised
/// view row everything user-facing renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedCase {
  #[serde(flatten)]
  pub case:           Case,
  pub requester:      PersonRef,
  pub related_person: PersonRef,
}

// ─── Linking ─────────────────────────────────────────────────────────────────

/// Join each case to its requester and related person from `people`.
///
/// Output order matches the input case order. Ids absent from `people`
/// become [`PersonRef::Unknown`]; no case is ever dropped.
pub fn link(cases: Vec<Case>, people: Vec<Person>) -> Vec<LinkedCase> {
  let referenced: std::collections::HashSet<Uuid> = cases
    .iter()
    .flat_map(|c| [c.requester_id, c.related_person_id])
    .collect();

  let by_id: HashMap<Uuid, Person> = people
    .into_iter()
    .filter(|p| referenced.contains(&p.id))
    .map(|p| (p.id, p))
    .collect();

  let resolve = |id: Uuid| match by_id.get(&id) {
    Some(person) => PersonRef::Known(person.clone()),
    None => PersonRef::Unknown { id },
  };

  cases
    .into_iter()
    .map(|case| LinkedCase {
      requester: resolve(case.requester_id),
      related_person: resolve(case.related_person_id),
      case,
    })
    .collect()
}

/// Split linked rows into `(pending, resolved)` on `is_resolved`,
/// preserving relative order within each half.
pub fn partition(rows: Vec<LinkedCase>) -> (Vec<LinkedCase>, Vec<LinkedCase>) {
  rows.into_iter().partition(|row| !row.case.is_resolved)
}
