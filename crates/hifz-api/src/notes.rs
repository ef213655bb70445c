//! Handlers for verse notes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/ayah/{id}/notes` | Newest first |
//! | `POST` | `/notes` | Body: [`NewNoteBody`]; returns the new id |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use hifz_core::{
  progress::{NewNote, Note},
  store::MemorizationStore,
};
use hifz_import::CorpusSource;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct NoteList {
  pub notes: Vec<Note>,
}

/// `GET /ayah/{id}/notes`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<NoteList>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let Path(raw) = id?;
  let Some(ayah_id) = crate::row_id(&raw) else {
    return Ok(Json(NoteList { notes: Vec::new() }));
  };
  let notes = state.store.list_notes(ayah_id).await.map_err(ApiError::store)?;
  Ok(Json(NoteList { notes }))
}

#[derive(Debug, Deserialize)]
pub struct NewNoteBody {
  pub ayah_id:   i64,
  pub user_name: String,
  pub note_text: String,
}

#[derive(Debug, Serialize)]
pub struct NoteCreated {
  pub message: String,
  pub note_id: i64,
}

/// `POST /notes`. Text is stored verbatim with no length limit.
pub async fn create<S, C>(
  State(state): State<ApiState<S, C>>,
  body: Result<Json<NewNoteBody>, JsonRejection>,
) -> Result<Json<NoteCreated>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let Json(body) = body?;
  state.roster.validate(&body.user_name)?;

  let note = state
    .store
    .add_note(NewNote {
      ayah_id:   body.ayah_id,
      user_name: body.user_name,
      note_text: body.note_text,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(Json(NoteCreated { message: "note added".into(), note_id: note.id }))
}
