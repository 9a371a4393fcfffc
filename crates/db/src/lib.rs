//! Postgres connection factory.
//!
//! The pool is created once at startup. An unset connection string is not an
//! error: callers get `None` and pick the in-memory store instead.

use std::time::Duration;

use anyhow::Context;
use shelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Open a pool against the configured database, or `None` when no URL is set.
///
/// The first connection is established eagerly so an unreachable server is
/// reported here rather than on the first request.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Option<PgPool>> {
    let Some(url) = settings.connection_url() else {
        tracing::info!(target: "shelf-db", "no database url configured");
        return Ok(None);
    };

    let redacted = redact(url);
    tracing::info!(target: "shelf-db", url = %redacted, "connecting to database");

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .connect(url)
        .await
        .with_context(|| format!("failed to connect to {}", redacted))?;

    Ok(Some(pool))
}

/// Round-trip a trivial query to confirm the pool is usable.
pub async fn ping(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("database ping failed")?;
    Ok(())
}

/// Mask the password component of a connection string for logging.
pub fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}
