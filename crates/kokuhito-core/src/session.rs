//! SessionContext — explicit per-session UI state.
//!
//! Replaces the original product's ambient `localStorage` flags (auth,
//! theme) and the case id carried in the URL with a value the view layer
//! is handed at startup and threads through explicitly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::link::LinkedCase;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

/// The durable external state the screens depend on: whether the shared
/// password has been entered, the theme, and which case (if any) is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
  pub authenticated: bool,
  pub theme:         Theme,
  /// The case id carried in the navigable location, if a case is open.
  pub selected_case: Option<Uuid>,
}

impl SessionContext {
  pub fn log_in(&mut self) { self.authenticated = true; }

  /// Logging out also closes any open case.
  pub fn log_out(&mut self) {
    self.authenticated = false;
    self.selected_case = None;
  }

  pub fn toggle_theme(&mut self) {
    self.theme = match self.theme {
      Theme::Light => Theme::Dark,
      Theme::Dark => Theme::Light,
    };
  }

  pub fn select_case(&mut self, id: Uuid) { self.selected_case = Some(id); }

  pub fn clear_selection(&mut self) { self.selected_case = None; }

  /// Drop a selection that no longer matches any fetched case.
  ///
  /// A stale id (the case was deleted, or the location was hand-edited) is
  /// discarded silently; this must never surface as an error.
  pub fn reconcile_selection(&mut self, rows: &[LinkedCase]) {
    if let Some(id) = self.selected_case
      && !rows.iter().any(|row| row.case.id == id)
    {
      self.selected_case = None;
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    case::Case,
    link::{LinkedCase, PersonRef},
  };

  fn row(id: Uuid) -> LinkedCase {
    let person = Uuid::new_v4();
    LinkedCase {
      case: Case {
        id,
        requester_id: person,
        related_person_id: person,
        vision_1: None,
        vision_2: None,
        resolution_comment: None,
        is_resolved: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
      },
      requester: PersonRef::Unknown { id: person },
      related_person: PersonRef::Unknown { id: person },
    }
  }

  #[test]
  fn reconcile_keeps_a_live_selection() {
    let id = Uuid::new_v4();
    let mut session = SessionContext::default();
    session.select_case(id);

    session.reconcile_selection(&[row(id)]);
    assert_eq!(session.selected_case, Some(id));
  }

  #[test]
  fn reconcile_drops_a_stale_selection() {
    let mut session = SessionContext::default();
    session.select_case(Uuid::new_v4());

    session.reconcile_selection(&[row(Uuid::new_v4())]);
    assert_eq!(session.selected_case, None);
  }

  #[test]
  fn reconcile_without_a_selection_is_a_no_op() {
    let mut session = SessionContext::default();
    session.reconcile_selection(&[]);
    assert_eq!(session.selected_case, None);
  }

  #[test]
  fn log_out_closes_the_open_case() {
    let mut session = SessionContext::default();
    session.log_in();
    session.select_case(Uuid::new_v4());

    session.log_out();
    assert!(!session.authenticated);
    assert_eq!(session.selected_case, None);
  }

  #[test]
  fn theme_toggles_both_ways() {
    let mut session = SessionContext::default();
    session.toggle_theme();
    assert_eq!(session.theme, Theme::Dark);
    session.toggle_theme();
    assert_eq!(session.theme, Theme::Light);
  }
}
