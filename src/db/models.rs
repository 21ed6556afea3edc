use rusqlite::Row;

use crate::time::parse_and_format_time;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Hex SHA-256 digest, never the plaintext.
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Username of the creator, copied at creation time.
    pub user: String,
    pub first_post: String,
    /// Last activity in the topic.
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub topic: i64,
    pub user: String,
    pub timestamp: String,
    pub updateon: String,
}

impl User {
    pub(crate) const COLUMNS: &'static str = "id, username, password";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
        })
    }
}

impl Topic {
    pub fn last_activity(&self) -> String {
        parse_and_format_time(&self.timestamp)
    }

    pub(crate) const COLUMNS: &'static str = "id, name, description, user, first_post, timestamp";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Topic {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            user: row.get(3)?,
            first_post: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }
}

impl Post {
    pub fn posted(&self) -> String {
        parse_and_format_time(&self.timestamp)
    }

    pub fn edited(&self) -> Option<String> {
        (self.updateon != self.timestamp).then(|| parse_and_format_time(&self.updateon))
    }

    pub(crate) const COLUMNS: &'static str = "id, content, topic, user, timestamp, updateon";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Post {
            id: row.get(0)?,
            content: row.get(1)?,
            topic: row.get(2)?,
            user: row.get(3)?,
            timestamp: row.get(4)?,
            updateon: row.get(5)?,
        })
    }
}
