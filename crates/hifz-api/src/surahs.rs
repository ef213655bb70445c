//! Read-only chapter endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/surahs` | All chapters by id |
//! | `GET`  | `/surah/{id}/progress` | Verse total + memorized count per user |
//! | `GET`  | `/surah/{id}/verses` | Verses with one `<user>_mem` flag per user |
//!
//! An unknown surah id is not an error: it yields zero counts and no verses.
//! The same goes for an id that is not a number at all.

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use hifz_core::{
  progress::{ChapterProgress, VerseProgress},
  quran::Surah,
  store::MemorizationStore,
};
use hifz_import::CorpusSource;
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct SurahList {
  pub surahs: Vec<Surah>,
}

/// `GET /surahs`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
) -> Result<Json<SurahList>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let surahs = state.store.list_surahs().await.map_err(ApiError::store)?;
  Ok(Json(SurahList { surahs }))
}

/// `GET /surah/{id}/progress`
///
/// The total and the per-user counts are two separate reads.
pub async fn progress<S, C>(
  State(state): State<ApiState<S, C>>,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<ChapterProgress>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let Path(raw) = id?;
  let Some(surah_id) = crate::row_id(&raw) else {
    return Ok(Json(state.roster.summarize(0, &[])));
  };
  let total = state.store.count_ayahs(surah_id).await.map_err(ApiError::store)?;
  let counts = state
    .store
    .memorized_counts(surah_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(state.roster.summarize(total, &counts)))
}

#[derive(Debug, Serialize)]
pub struct VerseList {
  pub verses: Vec<VerseProgress>,
}

/// `GET /surah/{id}/verses`
pub async fn verses<S, C>(
  State(state): State<ApiState<S, C>>,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<VerseList>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let Path(raw) = id?;
  let Some(surah_id) = crate::row_id(&raw) else {
    return Ok(Json(VerseList { verses: Vec::new() }));
  };
  let rows = state.store.verse_rows(surah_id).await.map_err(ApiError::store)?;
  Ok(Json(VerseList { verses: state.roster.annotate(rows) }))
}
