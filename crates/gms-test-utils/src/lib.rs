//! Shared test utilities for gms integration tests.
//!
//! One PostgreSQL instance is shared per test binary and every test gets a
//! fresh database inside it, migrated and ready. Set `GMS_TEST_PG_URL` to
//! reuse an already-running server (root URL, no database name); otherwise
//! a container is started through testcontainers on first use.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use gms_db::models::{Garden, GardenFields, NewPlant, Plant};
use gms_db::pool;
use gms_db::queries::{gardens, plants};

struct SharedPg {
    base_url: String,
    /// Keeps the container alive for the life of the test binary.
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn start_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("GMS_TEST_PG_URL") {
        return SharedPg {
            base_url: url.trim_end_matches('/').to_owned(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("16")
        .start()
        .await
        .expect("failed to start PostgreSQL container");
    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Root URL of the shared server (no database name appended).
pub async fn pg_url() -> &'static str {
    &SHARED_PG.get_or_init(start_shared_pg).await.base_url
}

async fn maintenance_pool() -> PgPool {
    let url = format!("{}/postgres", pg_url().await);
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("failed to connect to maintenance database")
}

/// Create a uniquely-named, migrated database.
///
/// Returns `(pool, db_name)`; hand `db_name` to [`drop_test_db`] at the end
/// of the test.
pub async fn create_test_db() -> (PgPool, String) {
    let db_name = format!("gms_test_{}", Uuid::new_v4().simple());

    let maint = maintenance_pool().await;
    maint
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e}"));
    maint.close().await;

    let url = format!("{}/{db_name}", pg_url().await);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to temp database {db_name}: {e}"));

    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");

    (pool, db_name)
}

/// Drop a database created by [`create_test_db`]. Safe to call twice.
pub async fn drop_test_db(db_name: &str) {
    let maint = maintenance_pool().await;
    let terminate = format!(
        "SELECT pg_terminate_backend(pid) \
         FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    );
    let _ = maint.execute(terminate.as_str()).await;
    let _ = maint
        .execute(format!("DROP DATABASE IF EXISTS {db_name}").as_str())
        .await;
    maint.close().await;
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a garden straight through the query layer.
pub async fn seed_garden(pool: &PgPool, name: &str, location: &str) -> Garden {
    let fields = GardenFields {
        name: name.to_owned(),
        location: location.to_owned(),
        description: None,
    };
    gardens::insert_garden(pool, &fields)
        .await
        .expect("seed garden insert should succeed")
}

/// Insert a plant under `garden_id` straight through the query layer.
pub async fn seed_plant(pool: &PgPool, garden_id: i64, name: &str) -> Plant {
    let plant = NewPlant {
        name: name.to_owned(),
        plant_type: "Flower".to_owned(),
        status: "Planted".to_owned(),
        date_planted: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid calendar date"),
    };
    plants::insert_plant(pool, garden_id, &plant)
        .await
        .expect("seed plant insert should succeed")
}
