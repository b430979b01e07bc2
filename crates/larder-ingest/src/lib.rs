//! CSV ingestion for the Larder table store.
//!
//! Two layers: [`loader`] turns CSV sources into
//! [`RowBatch`](larder_core::RowBatch) values (header trimming, whole-file
//! and fixed-size chunked reads), and [`pipeline`] orchestrates the loader
//! across the three datasets — the bulk reload from bundled files and the
//! single-table replace from an uploaded file.

pub mod error;
pub mod loader;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{reload_all, upload_one};
