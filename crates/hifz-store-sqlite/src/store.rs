//! [`SqliteStore`]: the SQLite implementation of [`MemorizationStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;

use hifz_core::{
  progress::{NewNote, Note, Progress, UserCount, VerseRow},
  quran::{NewAyah, Surah},
  store::MemorizationStore,
};

use crate::{
  Result,
  encode::{RawNote, RawProgress, encode_date, encode_dt, verse_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hifz store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Other clones of this store fail with
  /// a connection-closed error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MemorizationStore impl ──────────────────────────────────────────────────

impl MemorizationStore for SqliteStore {
  type Error = crate::Error;

  // ── Corpus ────────────────────────────────────────────────────────────────

  async fn count_surahs(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM surahs", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn insert_surah(&self, surah: Surah) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO surahs (id, name, revelation_type) VALUES (?1, ?2, ?3)",
          rusqlite::params![surah.id, surah.name, surah.revelation_type],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_ayah(&self, ayah: NewAyah) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ayahs (surah_id, verse_number, text) VALUES (?1, ?2, ?3)",
          rusqlite::params![ayah.surah_id, ayah.verse_number, ayah.text],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_surahs(&self) -> Result<Vec<Surah>> {
    let surahs = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, name, revelation_type FROM surahs ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Surah {
              id:              row.get(0)?,
              name:            row.get(1)?,
              revelation_type: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(surahs)
  }

  async fn count_ayahs(&self, surah_id: i64) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM ayahs WHERE surah_id = ?1",
          rusqlite::params![surah_id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn memorized_counts(&self, surah_id: i64) -> Result<Vec<UserCount>> {
    let counts = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.user_name, COUNT(p.ayah_id)
           FROM progress p
           JOIN ayahs a ON a.id = p.ayah_id
           WHERE a.surah_id = ?1 AND p.is_memorized = 1
           GROUP BY p.user_name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![surah_id], |row| {
            let count: i64 = row.get(1)?;
            Ok(UserCount { user_name: row.get(0)?, count: count as u64 })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(counts)
  }

  async fn verse_rows(&self, surah_id: i64) -> Result<Vec<VerseRow>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.id, a.verse_number, a.text, p.user_name, p.is_memorized
           FROM ayahs a
           LEFT JOIN progress p ON p.ayah_id = a.id
           WHERE a.surah_id = ?1
           ORDER BY a.verse_number, a.id, p.user_name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![surah_id], verse_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn get_progress(&self, ayah_id: i64, user_name: &str) -> Result<Option<Progress>> {
    let user_name = user_name.to_owned();

    let raw: Option<RawProgress> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT ayah_id, user_name, is_memorized, memorized_at
             FROM progress WHERE ayah_id = ?1 AND user_name = ?2",
            rusqlite::params![ayah_id, user_name],
            |row| {
              Ok(RawProgress {
                ayah_id:      row.get(0)?,
                user_name:    row.get(1)?,
                is_memorized: row.get(2)?,
                memorized_at: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProgress::into_progress).transpose()
  }

  async fn list_notes(&self, ayah_id: i64) -> Result<Vec<Note>> {
    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, ayah_id, user_name, note_text, created_at
           FROM notes
           WHERE ayah_id = ?1
           ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![ayah_id], |row| {
            Ok(RawNote {
              id:         row.get(0)?,
              ayah_id:    row.get(1)?,
              user_name:  row.get(2)?,
              note_text:  row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn set_memorized(
    &self,
    ayah_id:      i64,
    user_name:    String,
    is_memorized: bool,
  ) -> Result<Progress> {
    let today    = Utc::now().date_naive();
    let date_str = encode_date(today);
    let user     = user_name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO progress (ayah_id, user_name, is_memorized, memorized_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (ayah_id, user_name) DO UPDATE SET
             is_memorized = excluded.is_memorized,
             memorized_at = excluded.memorized_at",
          rusqlite::params![ayah_id, user, is_memorized, date_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Progress { ayah_id, user_name, is_memorized, memorized_at: Some(today) })
  }

  async fn add_note(&self, input: NewNote) -> Result<Note> {
    // Truncated to the stored precision so the returned note equals a re-read.
    let created_at = Utc::now().trunc_subsecs(6);
    let at_str     = encode_dt(created_at);
    let NewNote { ayah_id, user_name, note_text } = input;
    let (user, text) = (user_name.clone(), note_text.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (ayah_id, user_name, note_text, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![ayah_id, user, text, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Note { id, ayah_id, user_name, note_text, created_at })
  }
}
