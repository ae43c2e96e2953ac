use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::Validate;

use crate::util::Sensitive;

/// Configuration for connecting to the Postgres backing store.
#[derive(Debug, Deserialize, Validate)]
pub struct Database {
    /// Minimum idle database connections kept around so that requests do
    /// not pay the connection setup cost.
    ///
    /// **Environment variables**:
    /// - `PANEL_DB_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of connections the pool may hold.
    ///
    /// **Environment variables**:
    /// - `PANEL_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// How long a request may wait for a pooled connection before the
    /// store is reported as unavailable.
    ///
    /// **Environment variables**:
    /// - `PANEL_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Connection URL of the Postgres database.
    ///
    /// **Environment variables**:
    /// - `PANEL_DB_URL` or `DATABASE_URL`
    #[validate(url(message = "Invalid Postgres connection URL"))]
    pub url: Sensitive<String>,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }
}
