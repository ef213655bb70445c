//! The `MemorizationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `hifz-store-sqlite`).
//! Higher layers (`hifz-import`, `hifz-api`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  progress::{NewNote, Note, Progress, UserCount, VerseRow},
  quran::{NewAyah, Surah},
};

/// Abstraction over a Hifz store backend.
///
/// Surahs and ayahs are written only by the importer. Progress rows are
/// upserted; notes are append-only. No method deletes anything.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MemorizationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Corpus (importer writes) ──────────────────────────────────────────

  /// Number of surah rows currently stored.
  fn count_surahs(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Insert a surah with its caller-supplied chapter number as the key.
  /// Fails if the chapter number is already taken.
  fn insert_surah(
    &self,
    surah: Surah,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert a verse and return its store-assigned id.
  fn insert_ayah(
    &self,
    ayah: NewAyah,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All surahs ordered by id ascending.
  fn list_surahs(
    &self,
  ) -> impl Future<Output = Result<Vec<Surah>, Self::Error>> + Send + '_;

  /// Number of verses in a surah; zero for an unknown surah.
  fn count_ayahs(
    &self,
    surah_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Memorized-verse counts in a surah, grouped by stored user name.
  /// Users with no memorized verses are absent.
  fn memorized_counts(
    &self,
    surah_id: i64,
  ) -> impl Future<Output = Result<Vec<UserCount>, Self::Error>> + Send + '_;

  /// Verses of a surah outer-joined with their progress rows, ordered by
  /// verse number and grouped by verse.
  fn verse_rows(
    &self,
    surah_id: i64,
  ) -> impl Future<Output = Result<Vec<VerseRow>, Self::Error>> + Send + '_;

  /// The progress row for `(ayah_id, user_name)`, if any.
  fn get_progress<'a>(
    &'a self,
    ayah_id: i64,
    user_name: &'a str,
  ) -> impl Future<Output = Result<Option<Progress>, Self::Error>> + Send + 'a;

  /// Notes on a verse, newest first.
  fn list_notes(
    &self,
    ayah_id: i64,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert or overwrite the flag for `(ayah_id, user_name)`, stamping it
  /// with the current date. Returns the stored row.
  fn set_memorized(
    &self,
    ayah_id: i64,
    user_name: String,
    is_memorized: bool,
  ) -> impl Future<Output = Result<Progress, Self::Error>> + Send + '_;

  /// Append a note. `id` and `created_at` are set by the store.
  fn add_note(
    &self,
    note: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;
}
