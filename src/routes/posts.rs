use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::models::Post;
use crate::db::queries;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::flash::Flash;
use crate::state::AppState;
use crate::time::timestamp_now;

#[derive(Template)]
#[template(path = "pages/update.html")]
pub struct UpdateTemplate {
    pub flash: Option<String>,
    pub profile: String,
    pub post: Post,
}

#[derive(Deserialize)]
pub struct UpdatePostForm {
    pub content: String,
}

// Neither route checks that the caller wrote the post.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update/{post_id}", get(edit_page).post(update_post))
        .route("/delete/{post_id}", get(delete_post))
}

/// GET /update/{post_id} — edit form
async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
    flash: Flash,
) -> AppResult<Response> {
    let post = {
        let conn = state.db.get()?;
        queries::find_post(&conn, post_id)?.ok_or(AppError::NotFound)?
    };

    Ok(flash.render(|flash| UpdateTemplate {
        flash,
        profile: user.username,
        post,
    }))
}

/// POST /update/{post_id} — overwrite content, then bump the parent topic.
/// The two writes are separate commits.
async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
    Form(form): Form<UpdatePostForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    // No row written means the post is gone; leave the topic alone.
    if queries::update_post_content(&conn, post_id, &form.content, &timestamp_now())? == 0 {
        return Err(AppError::NotFound);
    }
    let post = queries::find_post(&conn, post_id)?.ok_or(AppError::NotFound)?;
    queries::touch_topic(&conn, post.topic, &timestamp_now())?;
    tracing::info!(post_id, topic_id = post.topic, user = %user.username, "Post updated");

    Ok(Redirect::to(&format!("/topic/{}", post.topic)).into_response())
}

/// GET /delete/{post_id} — hard delete, no confirmation step
async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = queries::find_post(&conn, post_id)?.ok_or(AppError::NotFound)?;

    queries::delete_post(&conn, post_id)?;
    tracing::info!(post_id, topic_id = post.topic, user = %user.username, "Post deleted");

    Ok(Redirect::to(&format!("/topic/{}", post.topic)).into_response())
}
