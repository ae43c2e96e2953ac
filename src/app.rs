use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{config, database};

/// Shared per-process state: the loaded configuration and the managed
/// connection pool. Everything else lives in the backing store.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub pool: database::Pool,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub fn new(config: config::Server) -> Result<Self, AppError> {
        let pool = database::Pool::new(&config.db).change_context(AppError)?;

        Ok(Self {
            config: Arc::new(config),
            pool,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let config = config::Server::for_tests();
        let pool = database::Pool::new(&config.db).expect("test pool should build");

        Self {
            config: Arc::new(config),
            pool,
        }
    }
}

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn db(&self) -> database::Result<database::Connection> {
        self.pool.get().await
    }
}
