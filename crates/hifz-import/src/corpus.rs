//! Shape of the upstream corpus document.
//!
//! The document is a JSON array. Each element should be a chapter object:
//!
//! ```json
//! { "surah_number": 1, "surah_name": "...", "revelation_place": "Meccan",
//!   "verses": [ { "verse_number": 1, "verse_text": "..." } ] }
//! ```
//!
//! Elements that are `null`, fail to parse, or carry no name are skipped.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct RawChapter {
  pub surah_number:     i64,
  #[serde(default)]
  pub surah_name:       Option<String>,
  #[serde(default)]
  pub revelation_place: Option<String>,
  #[serde(default)]
  pub verses:           Vec<RawVerse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVerse {
  pub verse_number: i64,
  pub verse_text:   String,
}

/// A chapter that passed validation; `name` is guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct Chapter {
  pub number:           i64,
  pub name:             String,
  pub revelation_place: Option<String>,
  pub verses:           Vec<RawVerse>,
}

/// Valid chapters in source order, plus how many elements were dropped.
#[derive(Debug, Default)]
pub struct ParsedCorpus {
  pub chapters: Vec<Chapter>,
  pub skipped:  usize,
}

pub fn parse(document: Vec<Value>) -> ParsedCorpus {
  let mut out = ParsedCorpus::default();
  for (index, element) in document.into_iter().enumerate() {
    if element.is_null() {
      out.skipped += 1;
      continue;
    }
    let raw: RawChapter = match serde_json::from_value(element) {
      Ok(raw) => raw,
      Err(e) => {
        tracing::warn!(index, error = %e, "skipping malformed chapter");
        out.skipped += 1;
        continue;
      }
    };
    let name = match raw.surah_name {
      Some(n) if !n.is_empty() => n,
      _ => {
        tracing::warn!(index, surah = raw.surah_number, "skipping chapter without a name");
        out.skipped += 1;
        continue;
      }
    };
    out.chapters.push(Chapter {
      number: raw.surah_number,
      name,
      revelation_place: raw.revelation_place,
      verses: raw.verses,
    });
  }
  out
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn keeps_order_and_skips_null_nameless_and_malformed() {
    let doc = vec![
      json!({ "surah_number": 1, "surah_name": "Al-Fatiha", "revelation_place": "Meccan",
              "verses": [ { "verse_number": 1, "verse_text": "a" },
                          { "verse_number": 2, "verse_text": "b" } ] }),
      Value::Null,
      json!({ "surah_number": 2, "verses": [] }),
      json!({ "surah_number": 3, "surah_name": "" }),
      json!({ "surah_name": "no number" }),
      json!({ "surah_number": 4, "surah_name": "An-Nisa", "extra": true }),
    ];
    let parsed = parse(doc);
    assert_eq!(parsed.skipped, 4);
    assert_eq!(parsed.chapters.iter().map(|c| c.number).collect::<Vec<_>>(), [1, 4]);
    assert_eq!(parsed.chapters[0].verses.len(), 2);
    assert_eq!(parsed.chapters[0].revelation_place.as_deref(), Some("Meccan"));
    assert!(parsed.chapters[1].verses.is_empty());
  }

  #[test]
  fn blank_but_present_names_are_kept() {
    let parsed = parse(vec![json!({ "surah_number": 5, "surah_name": "   " })]);
    assert_eq!(parsed.skipped, 0);
    assert_eq!(parsed.chapters[0].name, "   ");
  }
}
