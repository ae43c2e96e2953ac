use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

use crate::config;

pub type Connection = sqlx::pool::PoolConnection<Postgres>;
pub type Result<T, E = Error> = error_stack::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing store cannot be reached or the pool timed out handing
    /// out a connection. Surfaced uniformly to callers as "not ready".
    #[error("Backing store is not available")]
    Unavailable,
    #[error("Database operation failed")]
    Query,
}

pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|error| {
            let context = match &error {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(..) => {
                    Error::Unavailable
                }
                _ => Error::Query,
            };
            Report::new(error).change_context(context)
        })
    }
}

#[derive(Debug, Error)]
#[error("Failed to set up database pool")]
pub struct BuildPoolError;

#[derive(Debug, Error)]
#[error("Failed to run database migrations")]
pub struct MigrateError;

/// Connection pool over the backing store. Connections are acquired on
/// demand with a bounded timeout; a pool that cannot deliver one within
/// that window reports [`Error::Unavailable`] instead of blocking.
#[derive(Debug, Clone)]
pub struct Pool(PgPool);

impl Pool {
    pub fn new(config: &config::Database) -> Result<Self, BuildPoolError> {
        let inner = PgPoolOptions::new()
            .max_connections(config.pool_size.get())
            .min_connections(config.min_idle.map_or(0, NonZeroU32::get))
            .acquire_timeout(Duration::from_secs(config.timeout_secs.get()))
            .connect_lazy(config.url.as_str())
            .change_context(BuildPoolError)
            .attach_printable("could not parse the database connection URL")?;

        Ok(Self(inner))
    }

    #[tracing::instrument(skip_all, name = "db.acquire")]
    pub async fn get(&self) -> Result<Connection> {
        self.0.acquire().await.into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.migrate")]
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!()
            .run(&self.0)
            .await
            .change_context(MigrateError)
    }
}
