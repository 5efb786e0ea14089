use anyhow::Context;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use tracing::{error, info};

use crate::core::env::app_env::AppEnv;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub fn establish_connection(env: &AppEnv) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(&env.db.uri.0);

    let pool = r2d2::Pool::builder()
        .max_size(env.db.pool_size)
        .build(manager)
        .inspect_err(|e| error!("Failed to create pool: {}", e))
        .context("Database pool creation failed")?;

    info!(pool_size = env.db.pool_size, "Connected to database");

    Ok(pool)
}
