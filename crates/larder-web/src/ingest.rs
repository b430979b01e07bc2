//! Reload and upload endpoints.
//!
//! Both sit deliberately outside the cookie gate, matching the original
//! data-ops surface.

use axum::{
  extract::{Multipart, State},
  response::Html,
};
use larder_core::{DatasetKind, TableStore};

use crate::{AppState, error::Error, render};

/// Structured outcome of an upload attempt: success flag, affected
/// dataset, optional error message.
pub struct UploadOutcome {
  pub success:   bool,
  pub data_type: Option<DatasetKind>,
  pub error:     Option<String>,
}

impl UploadOutcome {
  fn ok(kind: DatasetKind) -> Self {
    Self {
      success:   true,
      data_type: Some(kind),
      error:     None,
    }
  }

  fn failed(kind: Option<DatasetKind>, error: impl Into<String>) -> Self {
    Self {
      success:   false,
      data_type: kind,
      error:     Some(error.into()),
    }
  }
}

/// `GET /reload_data` — bulk reload from the bundled CSVs.
pub async fn reload<S>(State(state): State<AppState<S>>) -> Html<String>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match larder_ingest::reload_all(state.store.as_ref(), &state.config.data_dir)
    .await
  {
    Ok(()) => Html(render::reload_result(None)),
    Err(err) => {
      tracing::error!("bulk reload failed: {err}");
      Html(render::reload_result(Some(&err.to_string())))
    }
  }
}

/// `GET /upload_data`
pub async fn upload_form() -> Html<String> {
  Html(render::upload_page())
}

/// `POST /upload_data` — replace one table from an uploaded CSV.
///
/// A missing file, missing selector, or unknown data type is rejected
/// before anything is dropped.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  mut multipart: Multipart,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut file: Option<Vec<u8>> = None;
  let mut data_type: Option<String> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| Error::BadRequest(e.to_string()))?
  {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some("file") => {
        file = Some(
          field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(e.to_string()))?
            .to_vec(),
        );
      }
      Some("data_type") => {
        data_type = Some(
          field
            .text()
            .await
            .map_err(|e| Error::BadRequest(e.to_string()))?,
        );
      }
      _ => {}
    }
  }

  let (Some(file), Some(data_type)) = (file, data_type) else {
    return Ok(Html(render::upload_result(&UploadOutcome::failed(
      None,
      "Missing file or data type.",
    ))));
  };

  let kind: DatasetKind = match data_type.parse() {
    Ok(kind) => kind,
    Err(err) => {
      return Ok(Html(render::upload_result(&UploadOutcome::failed(
        None,
        err.to_string(),
      ))));
    }
  };

  let outcome =
    match larder_ingest::upload_one(state.store.as_ref(), kind, &file).await {
      Ok(_) => UploadOutcome::ok(kind),
      Err(err) => UploadOutcome::failed(Some(kind), err.to_string()),
    };

  Ok(Html(render::upload_result(&outcome)))
}
