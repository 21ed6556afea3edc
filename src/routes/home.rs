use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};

use crate::auth::session;
use crate::db::models::Topic;
use crate::db::queries;
use crate::error::AppResult;
use crate::extractors::SessionToken;
use crate::flash::Flash;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flash: Option<String>,
    pub topics: Vec<Topic>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// GET / — ends any session, then lists every topic read-only.
pub async fn index(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    flash: Flash,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let clear = session::logout(&conn, &state.config.auth, token.as_deref())?;
    let topics = queries::list_topics(&conn)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear)]),
        flash.render(|flash| HomeTemplate { flash, topics }),
    )
        .into_response())
}
