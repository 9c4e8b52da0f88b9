//! PostgreSQL connectivity and table bootstrap.
//!
//! - [`db()`] — Establishes a shared connection from a database URL
//! - [`Schema`] — Table metadata and idempotent DDL
//! - [`bootstrap()`] — Creates a table and its indices if missing
//!
//! A single [`tokio_postgres::Client`] is shared by every request. The
//! client pipelines concurrent queries over one connection, and each query
//! lives only as long as the handler future that issued it.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Establishes a database connection and drives it on a background task.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls).await?;
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

/// Creates the table described by `S` along with its indices.
pub async fn bootstrap<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("ensuring table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await
}

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:     &str = "users";
/// Table for donation listings.
#[rustfmt::skip]
pub const DONATIONS: &str = "donations";
