//! Router integration tests over an in-memory store.

use std::{fs, path::PathBuf, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use larder_core::{DASHBOARD_CATEGORIES, DatasetKind, TableStore as _};
use larder_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, ServerConfig, router};

const HOUSEHOLDS_CSV: &str =
  "HSHD_NUM,L,AGE_RANGE,HH_SIZE,CHILDREN,INCOME_RANGE\n\
   101,Y,35-44,2,1,50-74K\n\
   102,N,65+,1,0,UNDER 35K\n";

const PRODUCTS_CSV: &str = "PRODUCT_NUM,DEPARTMENT,COMMODITY,BRAND_TY\n\
                            501,FOOD,DAIRY,PRIVATE\n\
                            502,FOOD,BAKERY,NATIONAL\n";

const TRANSACTIONS_CSV: &str =
  "HSHD_NUM,BASKET_NUM,PURCHASE_,PRODUCT_NUM,SPEND,UNITS,STORE_R,WEEK_NUM,YEAR\n\
   101,1,2018-01-03,501,2.50,1,SOUTH,1,2018\n\
   101,1,2018-01-03,502,4.00,1,SOUTH,1,2018\n\
   102,2,2018-02-10,501,3.00,2,EAST,6,2018\n";

async fn make_state(data_dir: PathBuf) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState {
    store:  Arc::new(store),
    config: Arc::new(ServerConfig {
      host: "127.0.0.1".to_string(),
      port: 8080,
      store_path: PathBuf::from(":memory:"),
      data_dir,
    }),
  }
}

async fn seed(state: &AppState<SqliteStore>) {
  for (kind, csv) in [
    (DatasetKind::Households, HOUSEHOLDS_CSV),
    (DatasetKind::Products, PRODUCTS_CSV),
    (DatasetKind::Transactions, TRANSACTIONS_CSV),
  ] {
    larder_ingest::upload_one(state.store.as_ref(), kind, csv.as_bytes())
      .await
      .unwrap();
  }
}

async fn oneshot_raw(
  state:   AppState<SqliteStore>,
  method:  &str,
  uri:     &str,
  headers: Vec<(header::HeaderName, &str)>,
  body:    &str,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

fn tbody(html: &str) -> &str {
  let start = html.find("<tbody>").expect("table body start");
  let end = html.find("</tbody>").expect("table body end");
  &html[start..end]
}

fn multipart_body(
  boundary: &str,
  fields: &[(&str, Option<&str>, &str)],
) -> String {
  let mut body = String::new();
  for (name, filename, value) in fields {
    body.push_str(&format!("--{boundary}\r\n"));
    match filename {
      Some(fname) => body.push_str(&format!(
        "Content-Disposition: form-data; name=\"{name}\"; \
         filename=\"{fname}\"\r\nContent-Type: text/csv\r\n\r\n"
      )),
      None => body.push_str(&format!(
        "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
      )),
    }
    body.push_str(value);
    body.push_str("\r\n");
  }
  body.push_str(&format!("--{boundary}--\r\n"));
  body
}

// ─── Gate and registration ───────────────────────────────────────────────────

#[tokio::test]
async fn gated_routes_redirect_without_cookie() {
  for uri in [
    "/",
    "/sample/101",
    "/dashboard_data",
    "/dashboard_progress",
    "/search",
    "/search-autocomplete?term=1",
    "/demographics",
    "/spending_trends",
  ] {
    let state = make_state(PathBuf::from(".")).await;
    let resp = oneshot_raw(state, "GET", uri, vec![], "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "uri: {uri}");
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/register",
      "uri: {uri}"
    );
  }
}

#[tokio::test]
async fn register_sets_cookies_and_redirects_to_dashboard() {
  let state = make_state(PathBuf::from(".")).await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/register",
    vec![(
      header::CONTENT_TYPE,
      "application/x-www-form-urlencoded",
    )],
    "username=alice&password=secret&email=alice%40example.com",
  )
  .await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

  let cookies: Vec<&str> = resp
    .headers()
    .get_all(header::SET_COOKIE)
    .iter()
    .map(|v| v.to_str().unwrap())
    .collect();
  assert_eq!(cookies.len(), 2);
  assert!(cookies[0].starts_with("username=alice;"));
  assert!(cookies[1].starts_with("email=alice@example.com;"));
  assert!(cookies.iter().all(|c| c.contains("Max-Age=2592000")));
}

#[tokio::test]
async fn registered_visitor_reaches_the_dashboard() {
  let state = make_state(PathBuf::from(".")).await;
  let resp = oneshot_raw(
    state,
    "GET",
    "/",
    vec![(header::COOKIE, "username=alice")],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = body_string(resp).await;
  assert!(html.contains("Household Purchase Dashboard"), "html: {html}");
}

// ─── Dashboard data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_data_carries_all_twelve_categories() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = oneshot_raw(
    state,
    "GET",
    "/dashboard_data",
    vec![(header::COOKIE, "username=alice")],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let payload: serde_json::Value =
    serde_json::from_str(&body_string(resp).await).unwrap();
  let object = payload.as_object().unwrap();
  assert_eq!(object.len(), DASHBOARD_CATEGORIES.len());
  for category in DASHBOARD_CATEGORIES {
    assert!(object[category].is_array(), "category: {category}");
  }

  // Distinct households in segmentation cannot exceed the loaded rows.
  let segmentation = object["segmentation"].as_array().unwrap();
  assert!(segmentation.len() <= 2);
}

#[tokio::test]
async fn dashboard_data_fails_as_a_whole_when_a_column_is_missing() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  // Replace transactions with a shape that has no SPEND column.
  larder_ingest::upload_one(
    state.store.as_ref(),
    DatasetKind::Transactions,
    "HSHD_NUM,BASKET_NUM\n101,1\n".as_bytes(),
  )
  .await
  .unwrap();

  let resp = oneshot_raw(
    state,
    "GET",
    "/dashboard_data",
    vec![(header::COOKIE, "username=alice")],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body = body_string(resp).await;
  assert!(body.contains("SPEND"), "body: {body}");
}

#[tokio::test]
async fn dashboard_progress_is_an_event_stream() {
  let state = make_state(PathBuf::from(".")).await;
  let resp = oneshot_raw(
    state,
    "GET",
    "/dashboard_progress",
    vec![(header::COOKIE, "username=alice")],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let content_type = resp
    .headers()
    .get(header::CONTENT_TYPE)
    .unwrap()
    .to_str()
    .unwrap();
  assert!(content_type.starts_with("text/event-stream"));
}

// ─── Search and sample ───────────────────────────────────────────────────────

#[tokio::test]
async fn search_and_sample_render_identical_row_sets() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let sample = body_string(
    oneshot_raw(
      state.clone(),
      "GET",
      "/sample/101",
      vec![(header::COOKIE, "username=alice")],
      "",
    )
    .await,
  )
  .await;

  let search = body_string(
    oneshot_raw(
      state,
      "POST",
      "/search",
      vec![
        (header::COOKIE, "username=alice"),
        (header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
      ],
      "hshd=101",
    )
    .await,
  )
  .await;

  assert_eq!(tbody(&sample), tbody(&search));
}

#[tokio::test]
async fn search_rejects_non_numeric_input() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = oneshot_raw(
    state,
    "POST",
    "/search",
    vec![
      (header::COOKIE, "username=alice"),
      (header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
    ],
    "hshd=abc",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn autocomplete_returns_matching_households() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = oneshot_raw(
    state,
    "GET",
    "/search-autocomplete?term=02",
    vec![(header::COOKIE, "username=alice")],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let numbers: Vec<i64> =
    serde_json::from_str(&body_string(resp).await).unwrap();
  assert_eq!(numbers, vec![102]);
}

// ─── Reload ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_is_ungated_and_reports_failure_banner() {
  // Empty data dir: the bundled files are missing, the banner says so.
  let dir = tempfile::tempdir().unwrap();
  let state = make_state(dir.path().to_path_buf()).await;

  let resp = oneshot_raw(state, "GET", "/reload_data", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = body_string(resp).await;
  assert!(html.contains("Reload Failed"), "html: {html}");
}

#[tokio::test]
async fn reload_loads_bundled_files_and_reports_success() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(
    dir.path().join(DatasetKind::Households.bundled_file()),
    HOUSEHOLDS_CSV,
  )
  .unwrap();
  fs::write(
    dir.path().join(DatasetKind::Products.bundled_file()),
    PRODUCTS_CSV,
  )
  .unwrap();
  fs::write(
    dir.path().join(DatasetKind::Transactions.bundled_file()),
    TRANSACTIONS_CSV,
  )
  .unwrap();
  let state = make_state(dir.path().to_path_buf()).await;

  let resp =
    oneshot_raw(state.clone(), "GET", "/reload_data", vec![], "").await;
  let html = body_string(resp).await;
  assert!(
    html.contains("Data Reload Completed Successfully"),
    "html: {html}"
  );

  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Households)
      .await
      .unwrap(),
    Some(2)
  );
  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Transactions)
      .await
      .unwrap(),
    Some(3)
  );
}

// ─── Upload ──────────────────────────────────────────────────────────────────

const BOUNDARY: &str = "larder-test-boundary";

async fn post_upload(
  state: AppState<SqliteStore>,
  fields: &[(&str, Option<&str>, &str)],
) -> axum::response::Response {
  let body = multipart_body(BOUNDARY, fields);
  let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
  let req = Request::builder()
    .method("POST")
    .uri("/upload_data")
    .header(header::CONTENT_TYPE, content_type)
    .body(Body::from(body))
    .unwrap();
  router(state).oneshot(req).await.unwrap()
}

#[tokio::test]
async fn upload_replaces_the_selected_table() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = post_upload(state.clone(), &[
    (
      "file",
      Some("households.csv"),
      "HSHD_NUM,L\n1,Y\n2,N\n3,Y\n",
    ),
    ("data_type", None, "households"),
  ])
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = body_string(resp).await;
  assert!(html.contains("Upload Completed Successfully"), "html: {html}");
  assert!(html.contains("households"), "html: {html}");

  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Households)
      .await
      .unwrap(),
    Some(3)
  );
  // The other datasets are untouched.
  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Products)
      .await
      .unwrap(),
    Some(2)
  );
}

#[tokio::test]
async fn upload_without_data_type_mutates_nothing() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = post_upload(state.clone(), &[(
    "file",
    Some("x.csv"),
    "HSHD_NUM\n1\n",
  )])
  .await;
  let html = body_string(resp).await;
  assert!(html.contains("Missing file or data type."), "html: {html}");

  for kind in DatasetKind::ALL {
    assert!(
      state.store.table_row_count(kind).await.unwrap().is_some(),
      "table dropped: {kind}"
    );
  }
  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Households)
      .await
      .unwrap(),
    Some(2)
  );
}

#[tokio::test]
async fn upload_with_unknown_data_type_mutates_nothing() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  let resp = post_upload(state.clone(), &[
    ("file", Some("x.csv"), "HSHD_NUM\n1\n"),
    ("data_type", None, "basket"),
  ])
  .await;
  let html = body_string(resp).await;
  assert!(html.contains("Upload Failed"), "html: {html}");
  assert!(html.contains("unknown dataset"), "html: {html}");

  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Households)
      .await
      .unwrap(),
    Some(2)
  );
  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Transactions)
      .await
      .unwrap(),
    Some(3)
  );
}

#[tokio::test]
async fn upload_failure_reports_error_banner() {
  let state = make_state(PathBuf::from(".")).await;
  seed(&state).await;

  // Ragged CSV: rejected during parse, before the drop.
  let resp = post_upload(state.clone(), &[
    ("file", Some("bad.csv"), "A,B\n1\n"),
    ("data_type", None, "products"),
  ])
  .await;
  let html = body_string(resp).await;
  assert!(html.contains("Upload Failed"), "html: {html}");

  assert_eq!(
    state
      .store
      .table_row_count(DatasetKind::Products)
      .await
      .unwrap(),
    Some(2)
  );
}
