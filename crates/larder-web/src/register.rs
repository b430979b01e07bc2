//! Registration: sets the cookies the gate checks for.
//!
//! No credential store exists. The password field is accepted and
//! discarded; the two cookies are unsigned and live for 30 days.

use axum::{
  Form,
  http::{HeaderValue, header},
  response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{error::Error, render};

const COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
  pub username: String,
  pub password: String,
  pub email:    String,
}

/// `GET /register`
pub async fn form() -> Html<String> {
  Html(render::register_page())
}

/// `POST /register` — set `username` and `email` cookies, redirect to `/`.
pub async fn submit(Form(form): Form<RegisterForm>) -> Result<Response, Error> {
  let mut response = Redirect::to("/").into_response();
  let headers = response.headers_mut();
  headers.append(header::SET_COOKIE, cookie("username", &form.username)?);
  headers.append(header::SET_COOKIE, cookie("email", &form.email)?);
  Ok(response)
}

fn cookie(name: &str, value: &str) -> Result<HeaderValue, Error> {
  HeaderValue::from_str(&format!(
    "{name}={value}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/"
  ))
  .map_err(|_| {
    Error::BadRequest(format!(
      "{name} contains characters not allowed in a cookie"
    ))
  })
}
