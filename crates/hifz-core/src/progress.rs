//! Per-user memorization state and notes, plus the read models assembled
//! from them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, ser::SerializeMap};

// ─── Stored rows ─────────────────────────────────────────────────────────────

/// One user's memorization flag for one verse. At most one row exists per
/// `(ayah_id, user_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
  pub ayah_id:      i64,
  pub user_name:    String,
  pub is_memorized: bool,
  /// Date of the most recent write, whatever the flag value.
  pub memorized_at: Option<NaiveDate>,
}

/// A free-text annotation on a verse. Notes are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:         i64,
  pub ayah_id:    i64,
  pub user_name:  String,
  pub note_text:  String,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MemorizationStore::add_note`].
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNote {
  pub ayah_id:   i64,
  pub user_name: String,
  pub note_text: String,
}

// ─── Raw aggregates ──────────────────────────────────────────────────────────

/// Memorized-verse count for one stored user name within a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCount {
  pub user_name: String,
  pub count:     u64,
}

/// One row of the verses ⟕ progress outer join. A verse with no progress rows
/// appears once with `user_name = None`; a verse with `n` rows appears `n`
/// times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRow {
  pub ayah_id:      i64,
  pub verse_number: i64,
  pub text:         String,
  pub user_name:    Option<String>,
  pub is_memorized: bool,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Total verses in a chapter and how many each recognized user has memorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterProgress {
  pub total_verses: u64,
  pub progress:     BTreeMap<String, u64>,
}

/// A verse annotated with one memorization flag per recognized user.
///
/// Serialises flat: `{"id", "verse_number", "text", "<user>_mem": 0|1, ...}`,
/// where `<user>` is the lowercased user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseProgress {
  pub id:           i64,
  pub verse_number: i64,
  pub text:         String,
  /// Keyed by user name as it appears in the roster.
  pub flags:        BTreeMap<String, bool>,
}

#[cfg(test)]
impl VerseProgress {
  pub(crate) fn is_memorized_by(&self, user: &str) -> bool {
    self.flags.get(user).copied().unwrap_or(false)
  }
}

/// The per-user key under which a verse flag is serialised.
pub fn flag_key(user: &str) -> String { format!("{}_mem", user.to_lowercase()) }

impl Serialize for VerseProgress {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    let mut map = s.serialize_map(Some(3 + self.flags.len()))?;
    map.serialize_entry("id", &self.id)?;
    map.serialize_entry("verse_number", &self.verse_number)?;
    map.serialize_entry("text", &self.text)?;
    for (user, memorized) in &self.flags {
      map.serialize_entry(&flag_key(user), &u8::from(*memorized))?;
    }
    map.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verse_progress_serialises_flat_integer_flags() {
    let verse = VerseProgress {
      id:           7,
      verse_number: 2,
      text:         "text".into(),
      flags:        BTreeMap::from([
        ("Siham".to_string(), true),
        ("Chaimaa".to_string(), false),
      ]),
    };
    let json = serde_json::to_value(&verse).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["verse_number"], 2);
    assert_eq!(json["siham_mem"], 1);
    assert_eq!(json["chaimaa_mem"], 0);
  }
}
