//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that they sort
//! lexicographically. Dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use hifz_core::progress::{Note, Progress, VerseRow};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `progress` row.
pub struct RawProgress {
  pub ayah_id:      i64,
  pub user_name:    String,
  pub is_memorized: bool,
  pub memorized_at: Option<String>,
}

impl RawProgress {
  pub fn into_progress(self) -> Result<Progress> {
    Ok(Progress {
      ayah_id:      self.ayah_id,
      user_name:    self.user_name,
      is_memorized: self.is_memorized,
      memorized_at: self.memorized_at.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// Raw values read directly from a `notes` row.
pub struct RawNote {
  pub id:         i64,
  pub ayah_id:    i64,
  pub user_name:  String,
  pub note_text:  String,
  pub created_at: String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         self.id,
      ayah_id:    self.ayah_id,
      user_name:  self.user_name,
      note_text:  self.note_text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Map one row of the ayahs ⟕ progress join. Columns:
/// `id, verse_number, text, user_name, is_memorized`.
pub fn verse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VerseRow> {
  let flag: Option<bool> = row.get(4)?;
  Ok(VerseRow {
    ayah_id:      row.get(0)?,
    verse_number: row.get(1)?,
    text:         row.get(2)?,
    user_name:    row.get(3)?,
    is_memorized: flag.unwrap_or(false),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let whole = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
    let frac  = DateTime::parse_from_rfc3339("2024-03-01T10:00:00.5Z").unwrap().with_timezone(&Utc);
    assert_eq!(encode_dt(whole).len(), encode_dt(frac).len());
    assert!(encode_dt(whole) < encode_dt(frac));
    assert_eq!(decode_dt(&encode_dt(frac)).unwrap(), frac);
  }

  #[test]
  fn bad_date_is_reported() {
    assert!(matches!(decode_date("yesterday"), Err(Error::DateParse(_))));
    assert_eq!(
      decode_date("2024-02-29").unwrap(),
      NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
  }
}
