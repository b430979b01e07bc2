//! Dashboard page, the aggregate JSON payload, and the progress stream.

use std::{convert::Infallible, time::Duration};

use axum::{
  Json,
  extract::State,
  response::{
    Html,
    sse::{Event, Sse},
  },
};
use larder_core::{DASHBOARD_CATEGORIES, TableStore};
use tokio_stream::{Stream, StreamExt as _, wrappers::IntervalStream};

use crate::{AppState, error::Error, gate::Registered, render};

/// `GET /`
pub async fn page<S>(_gate: Registered) -> Html<String>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Html(render::dashboard_page())
}

/// `GET /dashboard_data` — all twelve aggregates as one JSON object.
///
/// The sections run sequentially with no per-query error isolation; the
/// first failure fails the whole response.
pub async fn data<S>(
  _gate: Registered,
  State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let sections = state
    .store
    .dashboard_data()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let mut payload = serde_json::Map::new();
  for section in sections {
    payload.insert(
      section.category.to_string(),
      serde_json::Value::Array(
        section
          .rows
          .into_iter()
          .map(serde_json::Value::Object)
          .collect(),
      ),
    );
  }

  Ok(Json(serde_json::Value::Object(payload)))
}

const PROGRESS_STEP: Duration = Duration::from_secs(2);

/// `GET /dashboard_progress` — SSE stream of synthetic percentages.
///
/// One step per dashboard category at a fixed cadence. The stream is not
/// wired to `/dashboard_data` or to the reload pipeline; it only paces the
/// page's progress bar.
pub async fn progress<S>(
  _gate: Registered,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let total = DASHBOARD_CATEGORIES.len();
  let ticks = tokio::time::interval_at(
    tokio::time::Instant::now() + PROGRESS_STEP,
    PROGRESS_STEP,
  );

  let mut step = 0usize;
  let stream = IntervalStream::new(ticks).take(total).map(move |_| {
    step += 1;
    let percent = step * 100 / total;
    Ok(Event::default().data(percent.to_string()))
  });

  Sse::new(stream)
}
