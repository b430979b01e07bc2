//! The Tabular Loader: CSV sources to [`RowBatch`] values.
//!
//! Headers are whitespace-trimmed; data cells are passed through untouched.
//! Type inference is the store's job at write time.

use std::{
  fs::File,
  io::{BufRead as _, BufReader, Read},
  path::Path,
};

use larder_core::RowBatch;

use crate::{Error, Result};

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
  csv::ReaderBuilder::new()
    .trim(csv::Trim::Headers)
    .from_reader(source)
}

/// Open a CSV file, wrapping the failure with its path.
pub fn open(path: &Path) -> Result<File> {
  File::open(path).map_err(|source| Error::Open {
    path: path.to_path_buf(),
    source,
  })
}

/// Read an entire CSV source into one batch.
pub fn read_batch<R: Read>(source: R) -> Result<RowBatch> {
  let mut reader = csv_reader(source);
  let columns: Vec<String> =
    reader.headers()?.iter().map(str::to_owned).collect();

  let mut rows = Vec::new();
  for record in reader.records() {
    rows.push(record?.iter().map(str::to_owned).collect());
  }

  Ok(RowBatch { columns, rows })
}

/// Count data rows in a CSV file: line count minus the header line.
///
/// Intentionally a plain line count, not a CSV parse — it only feeds the
/// progress percentage, and multi-line quoted fields are not a thing in
/// these datasets.
pub fn count_data_rows(path: &Path) -> Result<u64> {
  let file = open(path)?;
  let mut lines = 0u64;
  for line in BufReader::new(file).lines() {
    line?;
    lines += 1;
  }
  Ok(lines.saturating_sub(1))
}

/// Reads a CSV source in fixed-size chunks, each sharing the trimmed
/// header. Used for the large datasets so a load never materialises the
/// whole file at once.
pub struct ChunkedReader<R: Read> {
  records:    csv::StringRecordsIntoIter<R>,
  columns:    Vec<String>,
  chunk_size: usize,
}

impl<R: Read> ChunkedReader<R> {
  pub fn new(source: R, chunk_size: usize) -> Result<Self> {
    let mut reader = csv_reader(source);
    let columns = reader.headers()?.iter().map(str::to_owned).collect();
    Ok(Self {
      records: reader.into_records(),
      columns,
      chunk_size,
    })
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  /// The next chunk, or `None` once the source is exhausted. The final
  /// chunk may be short.
  pub fn next_chunk(&mut self) -> Result<Option<RowBatch>> {
    let mut rows = Vec::with_capacity(self.chunk_size);
    while rows.len() < self.chunk_size {
      match self.records.next() {
        Some(record) => {
          rows.push(record?.iter().map(str::to_owned).collect())
        }
        None => break,
      }
    }

    if rows.is_empty() {
      return Ok(None);
    }
    Ok(Some(RowBatch {
      columns: self.columns.clone(),
      rows,
    }))
  }
}
