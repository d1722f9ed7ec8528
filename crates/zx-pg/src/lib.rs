//! PostgreSQL integration for the record store.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from a connection string
//! - [`migrate()`] — Creates a table and its indices if missing
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//!
//! ## Table Names
//!
//! Constants for all persistent entities: users, games, items, sessions.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Establishes a database connection.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
/// The connection future is driven on a spawned task; if it ends the
/// failure is logged and subsequent queries surface the error.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// Creates the table described by `T` and its indices.
pub async fn migrate<T: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("creating table ({})", T::name());
    client.batch_execute(T::creates()).await?;
    log::info!("indexing table ({})", T::name());
    client.batch_execute(T::indices()).await
}

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:    &str = "users";
/// Table for uploaded games.
#[rustfmt::skip]
pub const GAMES:    &str = "games";
/// Table for the marketplace catalog.
#[rustfmt::skip]
pub const ITEMS:    &str = "items";
/// Table for login sessions.
#[rustfmt::skip]
pub const SESSIONS: &str = "sessions";
