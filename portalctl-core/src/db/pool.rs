//! Database connection pool management
//!
//! Uses sqlx PgPool with a single connection: session state
//! (`search_path`, pending notices) must stay on one backend.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

/// One connection held for the whole session.
const MAX_CONNECTIONS: u32 = 1;

/// Give up on an unreachable server instead of hanging the menu.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the PostgreSQL pool.
///
/// # Errors
///
/// Returns an error if the first connection fails.
///
/// # Example
///
/// ```ignore
/// let options = PortalConfig::load(None)?.connect_options()?;
/// let pool = create_pool(options).await?;
/// ```
pub async fn create_pool(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
}
