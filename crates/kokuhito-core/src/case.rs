//! Case records and their input types.
//!
//! A case is a report filed by one person (`requester_id`) about another
//! (`related_person_id`); the two may be the same person. Cases are mutated
//! in place — there is no append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored case. Optional text fields are `None` when blank, never `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  pub id:                 Uuid,
  pub requester_id:       Uuid,
  pub related_person_id:  Uuid,
  pub vision_1:           Option<String>,
  pub vision_2:           Option<String>,
  pub resolution_comment: Option<String>,
  pub is_resolved:        bool,
  /// Server-assigned; never changes after creation.
  pub created_at:         DateTime<Utc>,
  /// Bumped by the store on every update.
  pub updated_at:         DateTime<Utc>,
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::add_case`].
///
/// `id` and the timestamps are always set by the store; they are not
/// accepted from callers. Both person references are optional here so form
/// state maps onto it directly; [`NewCase::validate`] rejects the missing
/// ones before any store call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCase {
  pub requester_id:       Option<Uuid>,
  pub related_person_id:  Option<Uuid>,
  #[serde(default)]
  pub vision_1:           Option<String>,
  #[serde(default)]
  pub vision_2:           Option<String>,
  #[serde(default)]
  pub resolution_comment: Option<String>,
  #[serde(default)]
  pub is_resolved:        bool,
}

/// A [`NewCase`] whose required references are proven present and whose
/// blank optionals are normalised away. Only this type reaches the store.
#[derive(Debug, Clone)]
pub struct ValidCase {
  pub requester_id:       Uuid,
  pub related_person_id:  Uuid,
  pub vision_1:           Option<String>,
  pub vision_2:           Option<String>,
  pub resolution_comment: Option<String>,
  pub is_resolved:        bool,
}

impl NewCase {
  /// Check required fields and normalise blank optional text to `None`.
  pub fn validate(self) -> crate::Result<ValidCase> {
    let requester_id = self
      .requester_id
      .ok_or(crate::Error::Validation("requester_id"))?;
    let related_person_id = self
      .related_person_id
      .ok_or(crate::Error::Validation("related_person_id"))?;

    Ok(ValidCase {
      requester_id,
      related_person_id,
      vision_1: normalize(self.vision_1),
      vision_2: normalize(self.vision_2),
      resolution_comment: normalize(self.resolution_comment),
      is_resolved: self.is_resolved,
    })
  }
}

// ─── CaseUpdate ──────────────────────────────────────────────────────────────

/// Partial update for [`crate::store::RecordStore::update_case`].
///
/// Absent fields are left untouched. The person references are deliberately
/// not here: they are immutable after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdate {
  /// `Some(None)` clears the field; `None` leaves it alone.
  #[serde(default, with = "serde_double_option")]
  pub vision_1:           Option<Option<String>>,
  #[serde(default, with = "serde_double_option")]
  pub vision_2:           Option<Option<String>>,
  #[serde(default, with = "serde_double_option")]
  pub resolution_comment: Option<Option<String>>,
  #[serde(default)]
  pub is_resolved:        Option<bool>,
}

impl CaseUpdate {
  /// An update that only flips the resolved flag.
  pub fn resolved(flag: bool) -> Self {
    Self { is_resolved: Some(flag), ..Self::default() }
  }

  /// True when no field is set; the store treats this as a no-op beyond
  /// bumping `updated_at`.
  pub fn is_empty(&self) -> bool {
    self.vision_1.is_none()
      && self.vision_2.is_none()
      && self.resolution_comment.is_none()
      && self.is_resolved.is_none()
  }

  /// Normalise blank text in the set fields to `None` (cleared).
  pub fn normalized(self) -> Self {
    Self {
      vision_1: self.vision_1.map(normalize),
      vision_2: self.vision_2.map(normalize),
      resolution_comment: self.resolution_comment.map(normalize),
      is_resolved: self.is_resolved,
    }
  }
}

/// Blank or whitespace-only text becomes `None`; the store never holds an
/// empty string in an optional column.
fn normalize(text: Option<String>) -> Option<String> {
  text.filter(|t| !t.trim().is_empty())
}

/// Serde helper distinguishing "field absent" from "field set to null" for
/// the `Option<Option<String>>` update fields.
mod serde_double_option {
  use serde::{Deserialize, Deserializer};

  pub fn deserialize<'de, D>(
    deserializer: D,
  ) -> Result<Option<Option<String>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    // Present in the JSON (even as null) means "set"; #[serde(default)]
    // covers the absent case.
    Option::<String>::deserialize(deserializer).map(Some)
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn validate_requires_requester() {
    let input = NewCase {
      related_person_id: Some(Uuid::new_v4()),
      ..NewCase::default()
    };
    let err = input.validate().unwrap_err();
    assert!(matches!(err, crate::Error::Validation("requester_id")));
  }

  #[test]
  fn validate_requires_related_person() {
    let input = NewCase {
      requester_id: Some(Uuid::new_v4()),
      ..NewCase::default()
    };
    let err = input.validate().unwrap_err();
    assert!(matches!(err, crate::Error::Validation("related_person_id")));
  }

  #[test]
  fn validate_normalises_blank_text_to_none() {
    let input = NewCase {
      requester_id: Some(Uuid::new_v4()),
      related_person_id: Some(Uuid::new_v4()),
      vision_1: Some("   ".into()),
      vision_2: Some("".into()),
      resolution_comment: Some("kept".into()),
      is_resolved: false,
    };
    let valid = input.validate().unwrap();
    assert_eq!(valid.vision_1, None);
    assert_eq!(valid.vision_2, None);
    assert_eq!(valid.resolution_comment.as_deref(), Some("kept"));
  }

  #[test]
  fn same_person_on_both_sides_is_allowed() {
    let id = Uuid::new_v4();
    let input = NewCase {
      requester_id: Some(id),
      related_person_id: Some(id),
      ..NewCase::default()
    };
    let valid = input.validate().unwrap();
    assert_eq!(valid.requester_id, valid.related_person_id);
  }

  #[test]
  fn update_resolved_sets_only_the_flag() {
    let update = CaseUpdate::resolved(true);
    assert_eq!(update.is_resolved, Some(true));
    assert!(update.vision_1.is_none());
    assert!(update.resolution_comment.is_none());
  }

  #[test]
  fn update_normalized_clears_blank_set_fields() {
    let update = CaseUpdate {
      vision_1: Some(Some("  ".into())),
      resolution_comment: Some(Some("done".into())),
      ..CaseUpdate::default()
    }
    .normalized();
    assert_eq!(update.vision_1, Some(None));
    assert_eq!(update.resolution_comment, Some(Some("done".into())));
  }

  #[test]
  fn update_json_distinguishes_absent_from_null() {
    let update: CaseUpdate =
      serde_json::from_str(r#"{"vision_1": null, "is_resolved": true}"#)
        .unwrap();
    assert_eq!(update.vision_1, Some(None));
    assert_eq!(update.vision_2, None);
    assert_eq!(update.is_resolved, Some(true));
  }
}
