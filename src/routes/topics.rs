use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::models::{Post, Topic};
use crate::db::queries::{self, NewTopic};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::flash::{redirect_with_flash, Flash};
use crate::state::AppState;
use crate::time::timestamp_now;

pub const MAX_TOPIC_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Stored in place of an empty description.
pub const EMPTY_DESCRIPTION: &str = "Nothing";

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/logged.html")]
pub struct LoggedTemplate {
    pub flash: Option<String>,
    pub profile: String,
    pub topics: Vec<Topic>,
}

/// Shared by the public and the signed-in thread views. `profile` is set only
/// for the signed-in view, which also gets the reply form.
#[derive(Template)]
#[template(path = "pages/thread.html")]
pub struct ThreadTemplate {
    pub flash: Option<String>,
    pub profile: Option<String>,
    pub topic: Topic,
    pub posts: Vec<Post>,
}

// --- Forms ---

#[derive(Deserialize)]
pub struct CreateTopicForm {
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub first_post: String,
}

#[derive(Deserialize)]
pub struct CreatePostForm {
    pub content: String,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logged", get(logged_page).post(create_topic))
        .route("/see/{topic_id}", get(see_topic))
        .route("/topic/{topic_id}", get(topic_page).post(create_post))
}

pub fn topic_fits(name: &str, description: &str) -> bool {
    name.chars().count() <= MAX_TOPIC_NAME_LEN
        && description.chars().count() <= MAX_DESCRIPTION_LEN
}

pub fn normalize_description(description: &str) -> &str {
    if description.is_empty() {
        EMPTY_DESCRIPTION
    } else {
        description
    }
}

// --- Handlers ---

/// GET /logged — every topic, plus the caller's name and the new-topic form
async fn logged_page(
    State(state): State<AppState>,
    user: CurrentUser,
    flash: Flash,
) -> AppResult<Response> {
    let topics = {
        let conn = state.db.get()?;
        queries::list_topics(&conn)?
    };

    Ok(flash.render(|flash| LoggedTemplate {
        flash,
        profile: user.username,
        topics,
    }))
}

/// POST /logged — create a topic owned by the caller
async fn create_topic(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<CreateTopicForm>,
) -> AppResult<Response> {
    if !topic_fits(&form.name, &form.description) {
        tracing::debug!("Topic rejected: field too long");
        return Ok(redirect_with_flash(
            "/logged",
            "Topic name must be at most 50 characters and description at most 200",
        ));
    }

    let conn = state.db.get()?;
    let id = queries::insert_topic(
        &conn,
        &NewTopic {
            name: &form.name,
            description: normalize_description(&form.description),
            user: &user.username,
            first_post: &form.first_post,
        },
        &timestamp_now(),
    )?;
    tracing::info!(topic_id = id, user = %user.username, "Topic created");

    Ok(Redirect::to("/logged").into_response())
}

/// GET /see/{topic_id} — read-only thread, no session needed
async fn see_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    flash: Flash,
) -> AppResult<Response> {
    let (topic, posts) = load_thread(&state, topic_id)?;

    Ok(flash.render(|flash| ThreadTemplate {
        flash,
        profile: None,
        topic,
        posts,
    }))
}

/// GET /topic/{topic_id} — thread with the reply form
async fn topic_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(topic_id): Path<i64>,
    flash: Flash,
) -> AppResult<Response> {
    let (topic, posts) = load_thread(&state, topic_id)?;

    Ok(flash.render(|flash| ThreadTemplate {
        flash,
        profile: Some(user.username),
        topic,
        posts,
    }))
}

/// POST /topic/{topic_id} — reply, then bump the topic's activity time.
/// The insert and the bump are separate commits.
async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(topic_id): Path<i64>,
    Form(form): Form<CreatePostForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    if queries::find_topic(&conn, topic_id)?.is_none() {
        return Err(AppError::NotFound);
    }

    let post_id = queries::insert_post(
        &conn,
        topic_id,
        &user.username,
        &form.content,
        &timestamp_now(),
    )?;
    queries::touch_topic(&conn, topic_id, &timestamp_now())?;
    tracing::info!(topic_id, post_id, user = %user.username, "Post created");

    Ok(Redirect::to(&format!("/topic/{}", topic_id)).into_response())
}

fn load_thread(state: &AppState, topic_id: i64) -> AppResult<(Topic, Vec<Post>)> {
    let conn = state.db.get()?;
    let topic = queries::find_topic(&conn, topic_id)?.ok_or(AppError::NotFound)?;
    let posts = queries::list_posts(&conn, topic_id)?;
    Ok((topic, posts))
}
