//! Handler for `POST /progress`, the memorization toggle.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use hifz_core::store::MemorizationStore;
use hifz_import::CorpusSource;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// `is_memorized` as sent by clients: a JSON boolean or `0` / `1`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Flag {
  Bool(bool),
  Int(i64),
}

impl From<Flag> for bool {
  fn from(f: Flag) -> bool {
    match f {
      Flag::Bool(b) => b,
      Flag::Int(n) => n != 0,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct SetProgressBody {
  pub ayah_id:      i64,
  pub user_name:    String,
  pub is_memorized: Flag,
}

#[derive(Debug, Serialize)]
pub struct Message {
  pub message: String,
}

/// `POST /progress`. Body: `{"ayah_id": 5, "user_name": "Siham", "is_memorized": 1}`
///
/// Upserts the `(ayah_id, user_name)` row and stamps it with today's date.
pub async fn set<S, C>(
  State(state): State<ApiState<S, C>>,
  body: Result<Json<SetProgressBody>, JsonRejection>,
) -> Result<Json<Message>, ApiError>
where
  S: MemorizationStore + 'static,
  C: CorpusSource + 'static,
{
  let Json(body) = body?;
  state.roster.validate(&body.user_name)?;

  state
    .store
    .set_memorized(body.ayah_id, body.user_name, body.is_memorized.into())
    .await
    .map_err(ApiError::store)?;

  Ok(Json(Message { message: "progress updated".into() }))
}
