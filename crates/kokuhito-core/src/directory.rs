//! PersonDirectory — loading, counting, searching and sorting people.
//!
//! The load functions talk to a [`RecordStore`]; everything else here is a
//! pure function over snapshots, so the search/sort behaviour is testable
//! without any store.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
  Error, Result,
  case::Case,
  person::{Person, PersonSummary},
  store::RecordStore,
};

// ─── Sort keys ───────────────────────────────────────────────────────────────

/// Orderings offered by the people list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  NameAscending,
  /// "Mais casos" in the product copy.
  CaseCountDescending,
  /// "Menos casos".
  CaseCountAscending,
}

// ─── Store-backed loads ──────────────────────────────────────────────────────

/// All people, sorted by name ascending (the store's order).
///
/// On failure the caller keeps whatever it had; nothing is partially
/// applied.
pub async fn load_all<S: RecordStore>(store: &S) -> Result<Vec<Person>> {
  store.list_people().await.map_err(Error::store)
}

/// All people annotated with their case counts. Two full-table reads, then
/// an in-memory count — fine at this tool's scale.
pub async fn load_summaries<S: RecordStore>(
  store: &S,
) -> Result<Vec<PersonSummary>> {
  let people = store.list_people().await.map_err(Error::store)?;
  let cases = store.list_cases().await.map_err(Error::store)?;
  Ok(with_case_counts(people, &cases))
}

// ─── Pure functions ──────────────────────────────────────────────────────────

/// Annotate each person with the number of cases naming them as requester
/// or related person. A case naming the same person on both sides counts
/// once for that person.
///
/// Builds a count index over the cases first, so the cost is
/// O(|people| + |cases|) rather than the naive product.
pub fn with_case_counts(
  people: Vec<Person>,
  cases: &[Case],
) -> Vec<PersonSummary> {
  let mut counts: HashMap<Uuid, usize> = HashMap::new();
  for case in cases {
    *counts.entry(case.requester_id).or_default() += 1;
    if case.related_person_id != case.requester_id {
      *counts.entry(case.related_person_id).or_default() += 1;
    }
  }

  people
    .into_iter()
    .map(|person| {
      let case_count = counts.get(&person.id).copied().unwrap_or(0);
      PersonSummary { person, case_count }
    })
    .collect()
}

/// Case-insensitive substring search on the name. An empty (or
/// whitespace-only) query returns everything.
pub fn filter_by_name(
  people: Vec<PersonSummary>,
  query: &str,
) -> Vec<PersonSummary> {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return people;
  }
  people
    .into_iter()
    .filter(|p| p.person.name.to_lowercase().contains(&query))
    .collect()
}

/// Reorder by `key`. The sort is stable: ties keep the relative order of
/// the input sequence.
pub fn sort_by(
  mut people: Vec<PersonSummary>,
  key: SortKey,
) -> Vec<PersonSummary> {
  match key {
    SortKey::NameAscending => {
      people.sort_by(|a, b| a.person.name.cmp(&b.person.name));
    }
    SortKey::CaseCountDescending => {
      people.sort_by(|a, b| b.case_count.cmp(&a.case_count));
    }
    SortKey::CaseCountAscending => {
      people.sort_by(|a, b| a.case_count.cmp(&b.case_count));
    }
  }
  people
}
