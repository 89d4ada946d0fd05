//! Database query functions for the `gardens` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{Garden, GardenFields};

/// Insert a new garden. Returns the row with its assigned `garden_id` and
/// `date_created`.
pub async fn insert_garden(pool: &PgPool, fields: &GardenFields) -> Result<Garden> {
    let garden = sqlx::query_as::<_, Garden>(
        "INSERT INTO gardens (name, location, description) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(&fields.name)
    .bind(&fields.location)
    .bind(&fields.description)
    .fetch_one(pool)
    .await
    .context("failed to insert garden")?;

    Ok(garden)
}

/// Fetch a garden by its id.
pub async fn get_garden(pool: &PgPool, garden_id: i64) -> Result<Option<Garden>> {
    let garden = sqlx::query_as::<_, Garden>("SELECT * FROM gardens WHERE garden_id = $1")
        .bind(garden_id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch garden")?;

    Ok(garden)
}

/// List all gardens in id order.
pub async fn list_gardens(pool: &PgPool) -> Result<Vec<Garden>> {
    let gardens = sqlx::query_as::<_, Garden>("SELECT * FROM gardens ORDER BY garden_id")
        .fetch_all(pool)
        .await
        .context("failed to list gardens")?;

    Ok(gardens)
}

/// Overwrite the three mutable fields of a garden.
///
/// `garden_id` and `date_created` are never part of the SET list. Returns
/// `None` when no row matched.
pub async fn update_garden(
    pool: &PgPool,
    garden_id: i64,
    fields: &GardenFields,
) -> Result<Option<Garden>> {
    let garden = sqlx::query_as::<_, Garden>(
        "UPDATE gardens \
         SET name = $2, location = $3, description = $4 \
         WHERE garden_id = $1 \
         RETURNING *",
    )
    .bind(garden_id)
    .bind(&fields.name)
    .bind(&fields.location)
    .bind(&fields.description)
    .fetch_optional(pool)
    .await
    .context("failed to update garden")?;

    Ok(garden)
}

/// Delete a garden. Returns the number of rows removed (0 or 1); deleting a
/// missing id is not an error.
pub async fn delete_garden(pool: &PgPool, garden_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM gardens WHERE garden_id = $1")
        .bind(garden_id)
        .execute(pool)
        .await
        .context("failed to delete garden")?;

    Ok(result.rows_affected())
}
