use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::AuthConfig;
use crate::db::models::User;
use crate::db::queries;

/// Create a new session for a user. Returns the session token.
pub fn create_session(
    conn: &Connection,
    user_id: i64,
    hours: u64,
) -> Result<String, rusqlite::Error> {
    let token = generate_token();
    let id = uuid::Uuid::now_v7().to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at) VALUES (?1, ?2, ?3, datetime('now', ?4))",
        params![id, user_id, token, format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// Delete a session by token.
pub fn delete_session(conn: &Connection, token: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Remove every session whose expiry has passed. Returns the number removed.
pub fn prune_expired(conn: &Connection) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM sessions WHERE expires_at <= datetime('now')", [])
}

/// Resolve a token to its user. The user row is re-read on every call.
pub fn current(conn: &Connection, token: &str) -> Result<Option<User>, rusqlite::Error> {
    let user_id: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > datetime('now')",
            params![token],
            |row| row.get(0),
        )
        .optional()?;

    match user_id {
        Some(id) => queries::find_user_by_id(conn, id),
        None => Ok(None),
    }
}

/// Bind a fresh session to `user`, replacing the client's `previous` one.
/// Returns the `Set-Cookie` value.
pub fn login(
    conn: &Connection,
    auth: &AuthConfig,
    user: &User,
    previous: Option<&str>,
) -> Result<String, rusqlite::Error> {
    if let Some(previous) = previous {
        delete_session(conn, previous)?;
    }
    let pruned = prune_expired(conn)?;
    if pruned > 0 {
        tracing::debug!(pruned, "Expired sessions removed");
    }

    let token = create_session(conn, user.id, auth.session_hours)?;
    tracing::info!(user_id = user.id, username = %user.username, "Session started");
    Ok(session_cookie(&auth.cookie_name, &token, auth.session_hours))
}

/// Drop whatever session `token` names, if any. Returns the `Set-Cookie`
/// value that clears the client's cookie.
pub fn logout(
    conn: &Connection,
    auth: &AuthConfig,
    token: Option<&str>,
) -> Result<String, rusqlite::Error> {
    if let Some(token) = token {
        delete_session(conn, token)?;
        tracing::debug!("Session ended");
    }
    Ok(clear_session_cookie(&auth.cookie_name))
}

// -- Cookie helpers --

fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
