//! Household search: exact lookup by form, substring autocomplete as JSON.

use axum::{
  Form, Json,
  extract::{Query, State},
  response::Html,
};
use larder_core::TableStore;
use serde::Deserialize;

use crate::{AppState, error::Error, gate::Registered, render};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
  pub hshd: Option<String>,
}

/// `GET /search`
pub async fn form<S>(_gate: Registered) -> Html<String>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Html(render::search_page(None))
}

/// `POST /search` — exact household lookup; renders the same row set as
/// `/sample/{n}`.
pub async fn submit<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
  Form(form): Form<SearchForm>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Some(raw) = form
    .hshd
    .as_deref()
    .map(str::trim)
    .filter(|value| !value.is_empty())
  else {
    return Ok(Html(render::search_page(None)));
  };

  let hshd_num: i64 = raw.parse().map_err(|_| {
    Error::BadRequest(format!("not a household number: {raw:?}"))
  })?;

  let result = state
    .store
    .household_sample(hshd_num)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Html(render::search_page(Some(&result))))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
  #[serde(default)]
  pub term: String,
}

/// `GET /search-autocomplete?term=…` — at most 10 household numbers.
pub async fn autocomplete<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
  Query(params): Query<AutocompleteParams>,
) -> Result<Json<Vec<i64>>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let numbers = state
    .store
    .household_autocomplete(&params.term)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(numbers))
}
