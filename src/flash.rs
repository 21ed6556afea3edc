//! One-shot notices that survive a single redirect.
//!
//! The message rides in a hex-encoded cookie set on the redirect response and
//! is cleared by whichever page renders it next.

use std::convert::Infallible;

use askama::Template;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::extractors::cookie_value;
use crate::routes::home::Html;

pub const FLASH_COOKIE: &str = "agora_flash";

const CLEAR_FLASH_COOKIE: &str = "agora_flash=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0";

/// The pending flash message, if the client carries one.
#[derive(Debug, Default)]
pub struct Flash(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = cookie_value(&parts.headers, FLASH_COOKIE)
            .and_then(|raw| hex::decode(raw).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok());
        Ok(Flash(message))
    }
}

impl Flash {
    /// Render a page built from the pending message and consume the message.
    pub fn render<T, F>(self, build: F) -> Response
    where
        T: Template,
        F: FnOnce(Option<String>) -> T,
    {
        let shown = self.0.is_some();
        let mut response = Html(build(self.0)).into_response();
        if shown {
            response.headers_mut().append(
                header::SET_COOKIE,
                HeaderValue::from_static(CLEAR_FLASH_COOKIE),
            );
        }
        response
    }
}

/// 303 redirect that carries `message` to the next rendered page.
pub fn redirect_with_flash(to: &str, message: &str) -> Response {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/",
        FLASH_COOKIE,
        hex::encode(message)
    );
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, to.to_string()), (header::SET_COOKIE, cookie)],
    )
        .into_response()
}
