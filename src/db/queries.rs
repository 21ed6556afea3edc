//! Row-level operations over `users`, `topics` and `posts`.
//!
//! Every function runs a single autocommitting statement against the given
//! connection. Callers that need several writes issue several calls.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::{Post, Topic, User};

// -- Users --

pub fn find_user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE username = ?1 LIMIT 1", User::COLUMNS),
        params![username],
        User::from_row,
    )
    .optional()
}

pub fn find_user_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", User::COLUMNS),
        params![id],
        User::from_row,
    )
    .optional()
}

/// First user matching both the username and the stored digest.
pub fn find_user_by_credentials(
    conn: &Connection,
    username: &str,
    digest: &str,
) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM users WHERE username = ?1 AND password = ?2 ORDER BY id LIMIT 1",
            User::COLUMNS
        ),
        params![username, digest],
        User::from_row,
    )
    .optional()
}

pub fn insert_user(conn: &Connection, username: &str, digest: &str) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![username, digest],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        password: digest.to_string(),
    })
}

// -- Topics --

pub struct NewTopic<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub user: &'a str,
    pub first_post: &'a str,
}

pub fn list_topics(conn: &Connection) -> rusqlite::Result<Vec<Topic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM topics ORDER BY id ASC",
        Topic::COLUMNS
    ))?;
    let topics = stmt
        .query_map([], Topic::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(topics)
}

pub fn find_topic(conn: &Connection, id: i64) -> rusqlite::Result<Option<Topic>> {
    conn.query_row(
        &format!("SELECT {} FROM topics WHERE id = ?1", Topic::COLUMNS),
        params![id],
        Topic::from_row,
    )
    .optional()
}

pub fn insert_topic(conn: &Connection, topic: &NewTopic<'_>, now: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO topics (name, description, user, first_post, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            topic.name,
            topic.description,
            topic.user,
            topic.first_post,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Bump a topic's activity timestamp. Returns the number of rows touched.
pub fn touch_topic(conn: &Connection, id: i64, now: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE topics SET timestamp = ?1 WHERE id = ?2",
        params![now, id],
    )
}

// -- Posts --

/// Posts of a topic, least recently edited first.
pub fn list_posts(conn: &Connection, topic_id: i64) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM posts WHERE topic = ?1 ORDER BY updateon ASC, id ASC",
        Post::COLUMNS
    ))?;
    let posts = stmt
        .query_map(params![topic_id], Post::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(posts)
}

pub fn find_post(conn: &Connection, id: i64) -> rusqlite::Result<Option<Post>> {
    conn.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", Post::COLUMNS),
        params![id],
        Post::from_row,
    )
    .optional()
}

/// Insert a post whose `timestamp` and `updateon` both start at `now`.
pub fn insert_post(
    conn: &Connection,
    topic_id: i64,
    user: &str,
    content: &str,
    now: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO posts (content, topic, user, timestamp, updateon) VALUES (?1, ?2, ?3, ?4, ?4)",
        params![content, topic_id, user, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_post_content(
    conn: &Connection,
    id: i64,
    content: &str,
    now: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE posts SET content = ?1, updateon = ?2 WHERE id = ?3",
        params![content, now, id],
    )
}

pub fn delete_post(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM posts WHERE id = ?1", params![id])
}
