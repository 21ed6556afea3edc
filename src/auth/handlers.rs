use askama::Template;
use axum::extract::State;
use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{password, session};
use crate::db::queries;
use crate::error::AppResult;
use crate::extractors::SessionToken;
use crate::flash::{redirect_with_flash, Flash};
use crate::state::AppState;

pub const MAX_USERNAME_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 8;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/registration.html")]
pub struct RegistrationTemplate {
    pub flash: Option<String>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm: String,
}

/// Reasons a registration is turned away. The message is shown to the user.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Username must be at most 20 characters")]
    UsernameTooLong,

    #[error("This username is already taken")]
    UsernameTaken,

    #[error("Password is not confirmed")]
    NotConfirmed,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password must be at most {0} characters")]
    PasswordTooLong(usize),
}

pub fn validate_username(username: &str) -> Result<(), RegistrationError> {
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(RegistrationError::UsernameTooLong);
    }
    Ok(())
}

/// Confirmation is checked before length.
pub fn validate_password(
    password: &str,
    confirm: &str,
    max_len: Option<usize>,
) -> Result<(), RegistrationError> {
    if password != confirm {
        return Err(RegistrationError::NotConfirmed);
    }
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(RegistrationError::PasswordTooShort);
    }
    match max_len {
        Some(max) if len > max => Err(RegistrationError::PasswordTooLong(max)),
        _ => Ok(()),
    }
}

fn reject_signup(err: RegistrationError) -> Response {
    tracing::debug!("Registration rejected: {}", err);
    redirect_with_flash("/signup", &err.to_string())
}

// -- Registration handlers --

/// GET /signup — render the registration form
pub async fn signup_page(flash: Flash) -> Response {
    flash.render(|flash| RegistrationTemplate { flash })
}

/// POST /signup — create an account and sign it in
pub async fn signup(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if let Err(err) = validate_username(&form.username) {
        return Ok(reject_signup(err));
    }

    let conn = state.db.get()?;

    // Check-then-insert; two concurrent signups for one name can both pass.
    if queries::find_user_by_username(&conn, &form.username)?.is_some() {
        return Ok(reject_signup(RegistrationError::UsernameTaken));
    }

    if let Err(err) = validate_password(
        &form.password,
        &form.confirm,
        state.config.auth.max_password_len,
    ) {
        return Ok(reject_signup(err));
    }

    let user = queries::insert_user(&conn, &form.username, &password::hash(&form.password))?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let cookie = session::login(&conn, &state.config.auth, &user, previous.as_deref())?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to("/logged"),
    )
        .into_response())
}

// -- Sign-in handlers --

/// GET /signin — render the login form
pub async fn signin_page(flash: Flash) -> Response {
    flash.render(|flash| LoginTemplate { flash })
}

/// POST /signin — check credentials and start a session
pub async fn signin(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    Form(form): Form<SigninForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(user) = password::verify(&conn, &form.username, &form.password)? else {
        tracing::debug!("Sign-in rejected");
        return Ok(redirect_with_flash("/signin", "Wrong username or password"));
    };

    let cookie = session::login(&conn, &state.config.auth, &user, previous.as_deref())?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to("/logged"),
    )
        .into_response())
}
