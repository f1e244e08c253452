//! Aggregate counts for the landing screen.

use serde::Serialize;

use crate::case::Case;

/// The four numbers the home screen shows. Never stored; tallied from the
/// latest snapshots on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
  pub total_cases:    usize,
  pub pending_cases:  usize,
  pub resolved_cases: usize,
  pub total_people:   usize,
}

impl Stats {
  pub fn tally(cases: &[Case], total_people: usize) -> Self {
    let resolved_cases = cases.iter().filter(|c| c.is_resolved).count();
    Self {
      total_cases: cases.len(),
      pending_cases: cases.len() - resolved_cases,
      resolved_cases,
      total_people,
    }
  }
}
