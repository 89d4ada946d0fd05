//! Connecting to PostgreSQL and bringing the schema up to date.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::{debug, info};

use crate::config::DbConfig;

/// The `gardens`/`plants` schema, compiled in from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("cannot reach PostgreSQL at {url}"))
}

/// Pool used by the REST service and the CLI.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    let pool = connect(&config.database_url, 10).await?;
    debug!(url = %config.database_url, "pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("applying gms migrations")?;
    info!(count = MIGRATOR.iter().count(), "schema up to date");
    Ok(())
}

/// Create the configured database through the server's `postgres` database
/// unless it is already there.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let name = config
        .database_name()
        .context("database URL has no database name")?;
    check_database_name(name)?;

    let admin = connect(&config.maintenance_url(), 1).await?;
    let outcome = create_if_missing(&admin, name).await;
    admin.close().await;

    if outcome? {
        info!(db = name, "database created");
    } else {
        info!(db = name, "database present");
    }
    Ok(())
}

/// Returns whether the database had to be created.
async fn create_if_missing(admin: &PgPool, name: &str) -> Result<bool> {
    let present: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(name)
            .fetch_one(admin)
            .await
            .context("looking up pg_database")?;
    if present {
        return Ok(false);
    }

    admin
        .execute(format!("CREATE DATABASE {name}").as_str())
        .await
        .with_context(|| format!("creating database {name}"))?;
    Ok(true)
}

/// `CREATE DATABASE` cannot bind its name, so only plain identifiers are
/// let through.
fn check_database_name(name: &str) -> Result<()> {
    let plain = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !plain {
        bail!("refusing database name {name:?}: use letters, digits and '_' only");
    }
    Ok(())
}

/// Row counts of `gardens` and `plants`, in that order.
pub async fn table_counts(pool: &PgPool) -> Result<Vec<(String, i64)>> {
    let (gardens, plants): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM gardens), (SELECT COUNT(*) FROM plants)",
    )
    .fetch_one(pool)
    .await
    .context("counting gardens and plants")?;
    Ok(vec![
        ("gardens".to_owned(), gardens),
        ("plants".to_owned(), plants),
    ])
}
