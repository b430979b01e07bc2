//! HTTP surface for the Larder dashboard.
//!
//! Exposes an axum [`Router`] backed by any [`TableStore`] plus the server
//! configuration. Most routes sit behind the cookie [`gate`]; the reload
//! and upload endpoints are deliberately open, matching the original
//! data-ops surface.

pub mod dashboard;
pub mod error;
pub mod gate;
pub mod ingest;
pub mod register;
pub mod render;
pub mod search;
pub mod tables;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use larder_core::TableStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LARDER_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file.
  pub store_path: PathBuf,
  /// Directory holding the three bundled CSVs for `/reload_data`.
  pub data_dir:   PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: TableStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the dashboard server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(dashboard::page::<S>))
    .route("/register", get(register::form).post(register::submit))
    .route("/sample/{hshd_num}", get(tables::sample::<S>))
    .route("/dashboard_data", get(dashboard::data::<S>))
    .route("/dashboard_progress", get(dashboard::progress::<S>))
    .route("/reload_data", get(ingest::reload::<S>))
    .route("/search", get(search::form::<S>).post(search::submit::<S>))
    .route("/search-autocomplete", get(search::autocomplete::<S>))
    .route("/demographics", get(tables::demographics::<S>))
    .route("/spending_trends", get(tables::spending_trends::<S>))
    .route("/upload_data", get(ingest::upload_form).post(ingest::upload::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
