//! bcrypt hashing and verification, run on tokio's blocking pool.
//!
//! A single hash at the default cost takes hundreds of milliseconds, so it
//! must never run on an executor thread or while a database transaction is
//! open.

use crate::ResultEngine;

/// Plaintext used to build the stand-in hash that unknown usernames are
/// verified against at login.
const DUMMY_PASSWORD: &str = "ledgerly-unknown-user";

pub(crate) async fn hash(password: &str, cost: u32) -> ResultEngine<String> {
    let password = password.to_owned();
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
}

pub(crate) async fn verify(password: &str, hash: &str) -> ResultEngine<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
}

/// A valid hash at `cost` that no real password is expected to match.
pub(crate) async fn dummy_hash(cost: u32) -> ResultEngine<String> {
    hash(DUMMY_PASSWORD, cost).await
}
