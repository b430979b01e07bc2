//! Core types and trait definitions for the Larder analytics store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod dataset;
pub mod error;
pub mod store;
pub mod table;

pub use dataset::DatasetKind;
pub use error::{Error, Result};
pub use store::{DASHBOARD_CATEGORIES, TableStore};
pub use table::{CellValue, DashboardSection, RowBatch, TableResult};
