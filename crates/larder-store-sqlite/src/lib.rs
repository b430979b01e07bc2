//! SQLite backend for the Larder table store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Tables are created dynamically
//! from CSV headers at write time; there is no declared schema.

mod encode;
mod store;

pub mod catalog;
pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
