//! [`SqliteStore`] — the SQLite implementation of [`TableStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};

use larder_core::{
  dataset::DatasetKind,
  store::TableStore,
  table::{CellValue, DashboardSection, RowBatch, TableResult},
};

use crate::{
  Error, Result, catalog,
  encode::{bind_cell, decode_cell, decode_json, infer_affinity, quote_ident},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Larder table store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

#[derive(Clone, Copy)]
enum WriteMode {
  Replace,
  Append,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write one batch inside a single transaction. Replace drops and
  /// recreates the table; append creates it only if a preceding drop
  /// removed it, so the first chunk of a chunked load re-establishes the
  /// shape.
  async fn write_rows(
    &self,
    dataset: DatasetKind,
    batch: RowBatch,
    mode: WriteMode,
  ) -> Result<usize> {
    if batch.columns.is_empty() {
      return Err(Error::EmptyBatch(dataset.table_name()));
    }

    let table = dataset.table_name();
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match mode {
          WriteMode::Replace => {
            tx.execute_batch(&format!(
              "DROP TABLE IF EXISTS {}",
              quote_ident(table)
            ))?;
            create_table(&tx, table, &batch)?;
          }
          WriteMode::Append => {
            if !table_exists(&tx, table)? {
              create_table(&tx, table, &batch)?;
            }
          }
        }
        let written = insert_batch(&tx, table, &batch)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  /// Run a fixed catalog statement and collect rows as typed cells.
  async fn table_query(
    &self,
    sql: &'static str,
    params: Vec<Value>,
  ) -> Result<TableResult> {
    let result = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> =
          stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
              cells.push(decode_cell(row.get_ref(idx)?));
            }
            Ok(cells)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(TableResult { columns, rows })
      })
      .await?;
    Ok(result)
  }
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

fn table_exists(
  conn: &rusqlite::Connection,
  table: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        rusqlite::params![table],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// CREATE TABLE from the batch header, one inferred affinity per column.
fn create_table(
  conn: &rusqlite::Connection,
  table: &str,
  batch: &RowBatch,
) -> rusqlite::Result<()> {
  let columns = batch
    .columns
    .iter()
    .enumerate()
    .map(|(idx, name)| {
      format!(
        "{} {}",
        quote_ident(name),
        infer_affinity(&batch.rows, idx).sql_type()
      )
    })
    .collect::<Vec<_>>()
    .join(", ");

  conn.execute_batch(&format!(
    "CREATE TABLE {} ({columns})",
    quote_ident(table)
  ))
}

fn insert_batch(
  conn: &rusqlite::Connection,
  table: &str,
  batch: &RowBatch,
) -> rusqlite::Result<usize> {
  let column_list = batch
    .columns
    .iter()
    .map(|c| quote_ident(c))
    .collect::<Vec<_>>()
    .join(", ");
  let placeholders = (1..=batch.columns.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");

  let mut stmt = conn.prepare(&format!(
    "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
    quote_ident(table)
  ))?;

  for row in &batch.rows {
    let values: Vec<Value> = row.iter().map(|cell| bind_cell(cell)).collect();
    stmt.execute(rusqlite::params_from_iter(values))?;
  }

  Ok(batch.rows.len())
}

// ─── TableStore impl ─────────────────────────────────────────────────────────

impl TableStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn drop_table(&self, dataset: DatasetKind) -> Result<()> {
    let table = dataset.table_name();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&format!(
          "DROP TABLE IF EXISTS {}",
          quote_ident(table)
        ))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_rows(
    &self,
    dataset: DatasetKind,
    batch: RowBatch,
  ) -> Result<usize> {
    self.write_rows(dataset, batch, WriteMode::Replace).await
  }

  async fn append_rows(
    &self,
    dataset: DatasetKind,
    batch: RowBatch,
  ) -> Result<usize> {
    self.write_rows(dataset, batch, WriteMode::Append).await
  }

  // ── Introspection ─────────────────────────────────────────────────────────

  async fn table_columns(
    &self,
    dataset: DatasetKind,
  ) -> Result<Option<Vec<String>>> {
    let table = dataset.table_name();
    let columns: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let rows = stmt
          .query_map(rusqlite::params![table], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(if columns.is_empty() { None } else { Some(columns) })
  }

  async fn table_row_count(
    &self,
    dataset: DatasetKind,
  ) -> Result<Option<u64>> {
    let table = dataset.table_name();
    let count = self
      .conn
      .call(move |conn| {
        if !table_exists(conn, table)? {
          return Ok(None);
        }
        let count: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
          [],
          |row| row.get(0),
        )?;
        Ok(Some(count as u64))
      })
      .await?;
    Ok(count)
  }

  // ── Query catalog ─────────────────────────────────────────────────────────

  async fn household_sample(&self, hshd_num: i64) -> Result<TableResult> {
    self
      .table_query(catalog::HOUSEHOLD_SAMPLE, vec![Value::Integer(hshd_num)])
      .await
  }

  async fn household_autocomplete(&self, term: &str) -> Result<Vec<i64>> {
    let pattern = format!("%{term}%");

    let cells = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(catalog::HOUSEHOLD_AUTOCOMPLETE)?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], |row| {
            Ok(decode_cell(row.get_ref(0)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // HSHD_NUM usually carries integer affinity, but a padded CSV can leave
    // it as text; accept both.
    Ok(
      cells
        .into_iter()
        .filter_map(|cell| match cell {
          CellValue::Integer(i) => Some(i),
          CellValue::Text(t) => t.trim().parse().ok(),
          _ => None,
        })
        .collect(),
    )
  }

  async fn demographics(&self) -> Result<TableResult> {
    self.table_query(catalog::DEMOGRAPHICS, vec![]).await
  }

  async fn spending_trends(&self) -> Result<TableResult> {
    self.table_query(catalog::SPENDING_TRENDS, vec![]).await
  }

  async fn dashboard_data(&self) -> Result<Vec<DashboardSection>> {
    let sections = self
      .conn
      .call(|conn| {
        let mut sections = Vec::with_capacity(catalog::DASHBOARD.len());

        for (category, sql) in catalog::DASHBOARD {
          let mut stmt = conn.prepare(sql)?;
          let columns: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

          let rows = stmt
            .query_map([], |row| {
              let mut object = serde_json::Map::new();
              for (idx, name) in columns.iter().enumerate() {
                object.insert(name.clone(), decode_json(row.get_ref(idx)?));
              }
              Ok(object)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          sections.push(DashboardSection { category, rows });
        }

        Ok(sections)
      })
      .await?;
    Ok(sections)
  }
}
