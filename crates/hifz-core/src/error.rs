//! Error types for `hifz-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown user: {0:?}")]
  UnknownUser(String),

  #[error("invalid roster: {0}")]
  InvalidRoster(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
