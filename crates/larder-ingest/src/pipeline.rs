//! The Ingestion Pipeline: bulk reload and targeted upload.

use std::path::Path;

use larder_core::{DatasetKind, TableStore};

use crate::{Error, Result, loader};

fn store_err<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(err))
}

/// Reload all three datasets from their bundled CSV files under
/// `data_dir`, strictly in [`DatasetKind::ALL`] order.
///
/// Each dataset's table is dropped first. Households load as a single
/// replace write; products and transactions load chunked (append per
/// chunk) with a progress percentage logged after every chunk, against a
/// total precomputed from the source's line count. The first error aborts
/// the remaining sequence — tables already dropped in this run are not
/// restored.
pub async fn reload_all<S>(store: &S, data_dir: &Path) -> Result<()>
where
  S: TableStore,
{
  for kind in DatasetKind::ALL {
    let path = data_dir.join(kind.bundled_file());
    store.drop_table(kind).await.map_err(store_err)?;

    match kind.chunk_size() {
      None => {
        let batch = loader::read_batch(loader::open(&path)?)?;
        let written = store.replace_rows(kind, batch).await.map_err(store_err)?;
        tracing::info!(dataset = %kind, rows = written, "dataset reloaded");
      }
      Some(chunk_size) => {
        let total = loader::count_data_rows(&path)?;
        let mut chunks = loader::ChunkedReader::new(loader::open(&path)?, chunk_size)?;
        let mut written = 0u64;

        while let Some(batch) = chunks.next_chunk()? {
          written +=
            store.append_rows(kind, batch).await.map_err(store_err)? as u64;
          let percent = if total == 0 {
            100.0
          } else {
            written as f64 / total as f64 * 100.0
          };
          tracing::info!(dataset = %kind, "reload progress: {percent:.2}%");
        }
        tracing::info!(dataset = %kind, rows = written, "dataset reloaded");
      }
    }
  }

  Ok(())
}

/// Replace one dataset's table from an uploaded CSV.
///
/// The CSV is parsed in full before anything is dropped, so a malformed
/// upload never destroys existing data. Returns the number of rows
/// written.
pub async fn upload_one<S>(
  store: &S,
  kind: DatasetKind,
  data: &[u8],
) -> Result<usize>
where
  S: TableStore,
{
  let batch = loader::read_batch(data)?;

  store.drop_table(kind).await.map_err(store_err)?;
  let written = store.replace_rows(kind, batch).await.map_err(store_err)?;
  tracing::info!(dataset = %kind, rows = written, "dataset replaced from upload");
  Ok(written)
}
