//! Cookie-presence Access Gate.
//!
//! Registration sets an unsigned `username` cookie; gated routes only check
//! that it exists. This is presence-only gating, not identity verification —
//! the cookie is trusted as-read.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
  response::{IntoResponse, Redirect, Response},
};
use larder_core::TableStore;

use crate::AppState;

/// Cookie checked by the gate; set by `POST /register`.
pub const GATE_COOKIE: &str = "username";

/// Zero-size marker: present in the handler means the gate cookie was found.
pub struct Registered;

/// Gate rejection: bounce the visitor to the registration form.
pub struct RedirectToRegister;

impl IntoResponse for RedirectToRegister {
  fn into_response(self) -> Response {
    Redirect::to("/register").into_response()
  }
}

/// Check the `Cookie` header for the gate cookie, by name only.
pub fn has_gate_cookie(headers: &HeaderMap) -> bool {
  let Some(cookies) =
    headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
  else {
    return false;
  };

  cookies
    .split(';')
    .any(|pair| matches!(pair.trim().split_once('='), Some((GATE_COOKIE, _))))
}

impl<S> FromRequestParts<AppState<S>> for Registered
where
  S: TableStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = RedirectToRegister;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    if has_gate_cookie(&parts.headers) {
      Ok(Registered)
    } else {
      Err(RedirectToRegister)
    }
  }
}
