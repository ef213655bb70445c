//! Corpus import for the Hifz store.
//!
//! Downloads the chapter/verse document, inserts it into a
//! [`hifz_core::store::MemorizationStore`] one row at a time, and tracks
//! on-demand runs as an observable background job.

pub mod corpus;
pub mod error;
pub mod importer;
pub mod job;
pub mod source;

pub use error::{Error, Result};
pub use importer::{ImportMode, ImportReport, Importer};
pub use job::{ImportJob, JobHandle, JobSnapshot, JobState};
pub use source::{CorpusSource, FileSource, HttpSource};

/// Upstream Warsh corpus, one JSON array of chapter objects.
pub const DEFAULT_CORPUS_URL: &str =
  "https://raw.githubusercontent.com/thetruetruth/quran-data-kfgqpc/main/warsh/data/warshData_v10.json";
