//! Database query functions for the `plants` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewPlant, Plant, PlantChanges};

/// Insert a plant under `garden_id`. The garden is not checked for
/// existence.
pub async fn insert_plant(pool: &PgPool, garden_id: i64, plant: &NewPlant) -> Result<Plant> {
    let plant = sqlx::query_as::<_, Plant>(
        "INSERT INTO plants (garden_id, name, plant_type, status, date_planted) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(garden_id)
    .bind(&plant.name)
    .bind(&plant.plant_type)
    .bind(&plant.status)
    .bind(plant.date_planted)
    .fetch_one(pool)
    .await
    .context("failed to insert plant")?;

    Ok(plant)
}

/// Fetch a plant by its id.
pub async fn get_plant(pool: &PgPool, id: Uuid) -> Result<Option<Plant>> {
    let plant = sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plant")?;

    Ok(plant)
}

/// List all plants, grouped by garden.
pub async fn list_plants(pool: &PgPool) -> Result<Vec<Plant>> {
    let plants =
        sqlx::query_as::<_, Plant>("SELECT * FROM plants ORDER BY garden_id, date_planted, id")
            .fetch_all(pool)
            .await
            .context("failed to list plants")?;

    Ok(plants)
}

/// List the plants recorded under one garden.
pub async fn list_plants_for_garden(pool: &PgPool, garden_id: i64) -> Result<Vec<Plant>> {
    let plants = sqlx::query_as::<_, Plant>(
        "SELECT * FROM plants WHERE garden_id = $1 ORDER BY date_planted, id",
    )
    .bind(garden_id)
    .fetch_all(pool)
    .await
    .context("failed to list plants for garden")?;

    Ok(plants)
}

/// Apply a partial update: provided fields replace the stored ones, the rest
/// keep their value. Returns `None` when no row matched.
pub async fn update_plant(pool: &PgPool, id: Uuid, changes: &PlantChanges) -> Result<Option<Plant>> {
    let plant = sqlx::query_as::<_, Plant>(
        "UPDATE plants \
         SET name = COALESCE($2, name), \
             plant_type = COALESCE($3, plant_type), \
             status = COALESCE($4, status), \
             date_planted = COALESCE($5, date_planted) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.plant_type)
    .bind(&changes.status)
    .bind(changes.date_planted)
    .fetch_optional(pool)
    .await
    .context("failed to update plant")?;

    Ok(plant)
}

/// Delete a plant. Returns the number of rows removed (0 or 1).
pub async fn delete_plant(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM plants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete plant")?;

    Ok(result.rows_affected())
}
