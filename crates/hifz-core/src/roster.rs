//! The set of recognized users and the response shaping that depends on it.
//!
//! Progress and notes are stored against free-form user names; only names in
//! the roster are accepted on write and reported on read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  progress::{ChapterProgress, UserCount, VerseProgress, VerseRow},
};

/// Users tracked when no roster is configured.
pub const DEFAULT_USERS: [&str; 3] = ["Soukaina", "Siham", "Chaimaa"];

/// An ordered, non-empty list of distinct user names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
  users: Vec<String>,
}

impl Roster {
  pub fn new<I, S>(users: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut out: Vec<String> = Vec::new();
    for user in users {
      let user = user.into().trim().to_owned();
      if user.is_empty() {
        return Err(Error::InvalidRoster("blank user name".into()));
      }
      if out.iter().any(|u| u.eq_ignore_ascii_case(&user)) {
        return Err(Error::InvalidRoster(format!("duplicate user {user:?}")));
      }
      out.push(user);
    }
    if out.is_empty() {
      return Err(Error::InvalidRoster("no users configured".into()));
    }
    Ok(Self { users: out })
  }

  pub fn users(&self) -> &[String] { &self.users }

  pub fn contains(&self, name: &str) -> bool {
    self.users.iter().any(|u| u == name)
  }

  /// Accept `name` only if it belongs to the roster.
  pub fn validate<'a>(&self, name: &'a str) -> Result<&'a str> {
    if self.contains(name) {
      Ok(name)
    } else {
      Err(Error::UnknownUser(name.to_owned()))
    }
  }

  /// Shape raw per-user counts into a [`ChapterProgress`]. Every roster user
  /// is present (defaulting to zero); counts for other names are dropped.
  pub fn summarize(&self, total_verses: u64, counts: &[UserCount]) -> ChapterProgress {
    let mut progress: BTreeMap<String, u64> =
      self.users.iter().map(|u| (u.clone(), 0)).collect();
    for c in counts {
      if let Some(slot) = progress.get_mut(&c.user_name) {
        *slot = c.count;
      }
    }
    ChapterProgress { total_verses, progress }
  }

  /// Fold outer-join rows into one [`VerseProgress`] per verse, keeping the
  /// input order. Rows must be grouped by verse.
  pub fn annotate(&self, rows: Vec<VerseRow>) -> Vec<VerseProgress> {
    let mut verses: Vec<VerseProgress> = Vec::new();
    for row in rows {
      let start_new = verses.last().is_none_or(|v| v.id != row.ayah_id);
      if start_new {
        verses.push(VerseProgress {
          id:           row.ayah_id,
          verse_number: row.verse_number,
          text:         row.text,
          flags:        self.users.iter().map(|u| (u.clone(), false)).collect(),
        });
      }
      let Some(user) = row.user_name else { continue };
      if let Some(current) = verses.last_mut()
        && let Some(flag) = current.flags.get_mut(&user)
      {
        *flag |= row.is_memorized;
      }
    }
    verses
  }
}

impl Default for Roster {
  fn default() -> Self {
    Self { users: DEFAULT_USERS.iter().map(|u| (*u).to_owned()).collect() }
  }
}

impl TryFrom<Vec<String>> for Roster {
  type Error = Error;

  fn try_from(users: Vec<String>) -> Result<Self> { Self::new(users) }
}

impl From<Roster> for Vec<String> {
  fn from(r: Roster) -> Self { r.users }
}
