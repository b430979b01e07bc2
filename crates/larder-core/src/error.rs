//! Error types for `larder-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown dataset: {0:?}")]
  UnknownDataset(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
