//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use hifz_core::{
  progress::NewNote,
  quran::{NewAyah, Surah},
  store::MemorizationStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn surah(id: i64, name: &str) -> Surah {
  Surah { id, name: name.into(), revelation_type: Some("Meccan".into()) }
}

/// Insert a surah with `verses` ayahs and return their ids in verse order.
async fn seed(s: &SqliteStore, surah_id: i64, verses: i64) -> Vec<i64> {
  s.insert_surah(surah(surah_id, &format!("Surah {surah_id}"))).await.unwrap();
  let mut ids = Vec::new();
  for n in 1..=verses {
    let id = s
      .insert_ayah(NewAyah { surah_id, verse_number: n, text: format!("{surah_id}:{n}") })
      .await
      .unwrap();
    ids.push(id);
  }
  ids
}

// ─── Corpus ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_has_no_surahs() {
  let s = store().await;
  assert_eq!(s.count_surahs().await.unwrap(), 0);
  assert!(s.list_surahs().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_surahs_is_ordered_by_id() {
  let s = store().await;
  s.insert_surah(surah(3, "Al-Imran")).await.unwrap();
  s.insert_surah(surah(1, "Al-Fatiha")).await.unwrap();
  s.insert_surah(Surah { id: 2, name: "Al-Baqara".into(), revelation_type: None })
    .await
    .unwrap();

  let all = s.list_surahs().await.unwrap();
  assert_eq!(all.iter().map(|x| x.id).collect::<Vec<_>>(), [1, 2, 3]);
  assert_eq!(all[1].revelation_type, None);
  assert_eq!(s.count_surahs().await.unwrap(), 3);
}

#[tokio::test]
async fn duplicate_surah_id_is_rejected() {
  let s = store().await;
  s.insert_surah(surah(1, "Al-Fatiha")).await.unwrap();
  assert!(s.insert_surah(surah(1, "Again")).await.is_err());
  assert_eq!(s.count_surahs().await.unwrap(), 1);
}

#[tokio::test]
async fn ayah_requires_existing_surah() {
  let s = store().await;
  let result = s
    .insert_ayah(NewAyah { surah_id: 99, verse_number: 1, text: "x".into() })
    .await;
  assert!(result.is_err(), "foreign key should reject orphan ayah");
}

#[tokio::test]
async fn count_ayahs_per_surah() {
  let s = store().await;
  seed(&s, 1, 7).await;
  seed(&s, 2, 3).await;
  assert_eq!(s.count_ayahs(1).await.unwrap(), 7);
  assert_eq!(s.count_ayahs(2).await.unwrap(), 3);
  assert_eq!(s.count_ayahs(42).await.unwrap(), 0);
}

// ─── Progress ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_memorized_twice_keeps_one_row() {
  let s = store().await;
  let ids = seed(&s, 1, 3).await;

  s.set_memorized(ids[0], "Siham".into(), true).await.unwrap();
  let second = s.set_memorized(ids[0], "Siham".into(), false).await.unwrap();
  assert!(!second.is_memorized);

  let row = s.get_progress(ids[0], "Siham").await.unwrap().unwrap();
  assert!(!row.is_memorized);
  assert_eq!(row.memorized_at, Some(Utc::now().date_naive()));

  let rows = s.verse_rows(1).await.unwrap();
  let for_first: Vec<_> = rows.iter().filter(|r| r.ayah_id == ids[0]).collect();
  assert_eq!(for_first.len(), 1, "exactly one progress row per (ayah, user)");
}

#[tokio::test]
async fn get_progress_missing_returns_none() {
  let s = store().await;
  let ids = seed(&s, 1, 1).await;
  assert!(s.get_progress(ids[0], "Siham").await.unwrap().is_none());
}

#[tokio::test]
async fn set_memorized_on_missing_ayah_fails() {
  let s = store().await;
  assert!(s.set_memorized(12345, "Siham".into(), true).await.is_err());
}

#[tokio::test]
async fn memorized_counts_only_count_flagged_rows_in_surah() {
  let s = store().await;
  let first = seed(&s, 1, 4).await;
  let other = seed(&s, 2, 2).await;

  s.set_memorized(first[0], "Siham".into(), true).await.unwrap();
  s.set_memorized(first[1], "Siham".into(), true).await.unwrap();
  s.set_memorized(first[2], "Siham".into(), false).await.unwrap();
  s.set_memorized(first[0], "Chaimaa".into(), true).await.unwrap();
  s.set_memorized(other[0], "Siham".into(), true).await.unwrap();

  let mut counts = s.memorized_counts(1).await.unwrap();
  counts.sort_by(|a, b| a.user_name.cmp(&b.user_name));
  assert_eq!(counts.len(), 2);
  assert_eq!((counts[0].user_name.as_str(), counts[0].count), ("Chaimaa", 1));
  assert_eq!((counts[1].user_name.as_str(), counts[1].count), ("Siham", 2));

  assert!(s.memorized_counts(42).await.unwrap().is_empty());
}

#[tokio::test]
async fn verse_rows_include_verses_without_progress() {
  let s = store().await;
  // Insert out of order to check sorting by verse number.
  s.insert_surah(surah(1, "Al-Fatiha")).await.unwrap();
  for n in [3, 1, 2] {
    s.insert_ayah(NewAyah { surah_id: 1, verse_number: n, text: format!("v{n}") })
      .await
      .unwrap();
  }

  let rows = s.verse_rows(1).await.unwrap();
  assert_eq!(rows.iter().map(|r| r.verse_number).collect::<Vec<_>>(), [1, 2, 3]);
  assert!(rows.iter().all(|r| r.user_name.is_none() && !r.is_memorized));
}

#[tokio::test]
async fn verse_rows_join_every_progress_row() {
  let s = store().await;
  let ids = seed(&s, 1, 2).await;
  s.set_memorized(ids[1], "Siham".into(), true).await.unwrap();
  s.set_memorized(ids[1], "Soukaina".into(), false).await.unwrap();

  let rows = s.verse_rows(1).await.unwrap();
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0].ayah_id, ids[0]);
  assert_eq!(rows[1].user_name.as_deref(), Some("Siham"));
  assert!(rows[1].is_memorized);
  assert_eq!(rows[2].user_name.as_deref(), Some("Soukaina"));
  assert!(!rows[2].is_memorized);
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn notes_are_listed_newest_first() {
  let s = store().await;
  let ids = seed(&s, 1, 2).await;

  let mut added = Vec::new();
  for i in 0..4 {
    let note = s
      .add_note(NewNote {
        ayah_id:   ids[0],
        user_name: "Chaimaa".into(),
        note_text: format!("note {i}"),
      })
      .await
      .unwrap();
    added.push(note);
  }
  s.add_note(NewNote { ayah_id: ids[1], user_name: "Siham".into(), note_text: "other".into() })
    .await
    .unwrap();

  let listed = s.list_notes(ids[0]).await.unwrap();
  assert_eq!(listed.len(), 4);
  added.reverse();
  assert_eq!(listed, added);
  assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn note_on_missing_ayah_fails() {
  let s = store().await;
  let result = s
    .add_note(NewNote { ayah_id: 7, user_name: "Siham".into(), note_text: "x".into() })
    .await;
  assert!(result.is_err());
}

// ─── File-backed store ───────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_data_and_schema() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("hifz.db");

  let s = SqliteStore::open(&path).await.unwrap();
  seed(&s, 1, 2).await;
  s.close().await.unwrap();

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.count_surahs().await.unwrap(), 1);
  assert_eq!(reopened.count_ayahs(1).await.unwrap(), 2);
  reopened.close().await.unwrap();
}
