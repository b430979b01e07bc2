//! The `TableStore` trait: the storage contract the ingestion pipeline
//! writes through and the query catalog reads through.
//!
//! The trait is implemented by storage backends (e.g. `larder-store-sqlite`).
//! Higher layers (`larder-ingest`, `larder-web`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  dataset::DatasetKind,
  table::{DashboardSection, RowBatch, TableResult},
};

/// The fixed dashboard categories, in the order `dashboard_data` runs them.
pub const DASHBOARD_CATEGORIES: [&str; 12] = [
  "engagement",
  "demographics",
  "segmentation",
  "loyalty",
  "basket",
  "seasonal",
  "brand",
  "clv",
  "churn",
  "socioeconomic",
  "regional",
  "demand",
];

/// Abstraction over a Larder table store backend.
///
/// Writes follow replace/append semantics: `replace_rows` is
/// drop-and-recreate, `append_rows` adds to an existing table (creating it
/// from the batch shape if a preceding drop removed it). There is no
/// in-place row update anywhere.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Drop the dataset's table if it exists.
  fn drop_table(
    &self,
    dataset: DatasetKind,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Drop-and-recreate the dataset's table from `batch`, in one
  /// transaction. Returns the number of rows written.
  fn replace_rows(
    &self,
    dataset: DatasetKind,
    batch: RowBatch,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Append `batch` to the dataset's table, creating the table from the
  /// batch shape if it does not exist. Each call is its own transaction;
  /// a failed append leaves earlier appends in place.
  fn append_rows(
    &self,
    dataset: DatasetKind,
    batch: RowBatch,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Introspection ─────────────────────────────────────────────────────

  /// The dataset's column names, or `None` if the table is absent.
  fn table_columns(
    &self,
    dataset: DatasetKind,
  ) -> impl Future<Output = Result<Option<Vec<String>>, Self::Error>> + Send + '_;

  /// The dataset's row count, or `None` if the table is absent.
  fn table_row_count(
    &self,
    dataset: DatasetKind,
  ) -> impl Future<Output = Result<Option<u64>, Self::Error>> + Send + '_;

  // ── Query catalog ─────────────────────────────────────────────────────

  /// Row-level purchase lines for one household, joined with products,
  /// in a fixed order.
  fn household_sample(
    &self,
    hshd_num: i64,
  ) -> impl Future<Output = Result<TableResult, Self::Error>> + Send + '_;

  /// Distinct household numbers whose text form contains `term`.
  /// At most 10 results, ascending.
  fn household_autocomplete<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + 'a;

  /// Average spend grouped by household size, children and income range.
  fn demographics(
    &self,
  ) -> impl Future<Output = Result<TableResult, Self::Error>> + Send + '_;

  /// Total spend by year and week.
  fn spending_trends(
    &self,
  ) -> impl Future<Output = Result<TableResult, Self::Error>> + Send + '_;

  /// Run all twelve [`DASHBOARD_CATEGORIES`] aggregates sequentially and
  /// return them in order. There is no per-query error isolation: the
  /// first failure fails the whole call.
  fn dashboard_data(
    &self,
  ) -> impl Future<Output = Result<Vec<DashboardSection>, Self::Error>> + Send + '_;
}
