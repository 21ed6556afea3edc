use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::db::models::User;
use crate::db::queries;

/// Unsalted SHA-256 of the password, as 64 lowercase hex characters.
pub fn hash(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Look up the user with this exact username whose stored digest matches.
/// An unknown user and a wrong password both yield `None`.
pub fn verify(
    conn: &Connection,
    username: &str,
    plaintext: &str,
) -> rusqlite::Result<Option<User>> {
    queries::find_user_by_credentials(conn, username, &hash(plaintext))
}
