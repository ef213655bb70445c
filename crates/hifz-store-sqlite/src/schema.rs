//! SQL schema for the Hifz SQLite store.
//!
//! Executed every time a connection is opened. There are no migrations; the
//! version number in `PRAGMA user_version` only records which DDL created the
//! file.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Written once by the importer; id is the chapter number.
CREATE TABLE IF NOT EXISTS surahs (
    id              INTEGER PRIMARY KEY,
    name            TEXT NOT NULL,
    revelation_type TEXT
);

CREATE TABLE IF NOT EXISTS ayahs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    surah_id     INTEGER NOT NULL REFERENCES surahs(id),
    verse_number INTEGER NOT NULL,
    text         TEXT NOT NULL
);

-- One row per (verse, user); upserted by the memorization toggle.
CREATE TABLE IF NOT EXISTS progress (
    ayah_id      INTEGER NOT NULL REFERENCES ayahs(id),
    user_name    TEXT NOT NULL,
    is_memorized INTEGER NOT NULL DEFAULT 0,
    memorized_at TEXT,             -- YYYY-MM-DD
    PRIMARY KEY (ayah_id, user_name)
);

-- Append-only.
CREATE TABLE IF NOT EXISTS notes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    ayah_id    INTEGER NOT NULL REFERENCES ayahs(id),
    user_name  TEXT NOT NULL,
    note_text  TEXT NOT NULL,
    created_at TEXT NOT NULL       -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS ayahs_surah_idx ON ayahs(surah_id);
CREATE INDEX IF NOT EXISTS notes_ayah_idx  ON notes(ayah_id);

PRAGMA user_version = 1;
";
