//! Error type for `larder-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A write was attempted with a batch that has no columns; there is
  /// nothing to create a table from.
  #[error("batch for table {0:?} has no columns")]
  EmptyBatch(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
