//! Row-level and fixed aggregate table views.

use axum::{
  extract::{Path, State},
  response::Html,
};
use larder_core::TableStore;

use crate::{AppState, error::Error, gate::Registered, render};

/// `GET /sample/{hshd_num}` — purchase lines for one household.
pub async fn sample<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
  Path(hshd_num): Path<i64>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let result = state
    .store
    .household_sample(hshd_num)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Html(render::table_page(
    &format!("Household {hshd_num}"),
    &result,
  )))
}

/// `GET /demographics`
pub async fn demographics<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let result = state
    .store
    .demographics()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Html(render::table_page("Demographics", &result)))
}

/// `GET /spending_trends`
pub async fn spending_trends<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let result = state
    .store
    .spending_trends()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Html(render::table_page("Spending Trends", &result)))
}
