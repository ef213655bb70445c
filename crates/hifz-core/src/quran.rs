//! Chapters and verses: the read-only corpus loaded by the importer.
//!
//! Rows of both kinds are written once during import and never updated or
//! deleted afterwards.

use serde::{Deserialize, Serialize};

/// A chapter of the corpus, keyed by its stable chapter number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
  pub id:              i64,
  pub name:            String,
  /// "Meccan" / "Medinan" in the upstream corpus; absent for some sources.
  pub revelation_type: Option<String>,
}

/// A verse to store; the store assigns its surrogate id. `verse_number`
/// counts from 1 within its surah.
#[derive(Debug, Clone)]
pub struct NewAyah {
  pub surah_id:     i64,
  pub verse_number: i64,
  pub text:         String,
}
