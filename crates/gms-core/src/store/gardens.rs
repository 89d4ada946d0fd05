//! Garden store access.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use gms_db::models::{Garden, GardenFields};
use gms_db::queries::gardens as garden_db;

use super::{Entity, StoreError, validated};
use crate::validate::{SchemaName, SchemaValidator};

/// All gardens in store order.
pub async fn list_gardens(pool: &PgPool) -> Result<Vec<Garden>, StoreError> {
    Ok(garden_db::list_gardens(pool).await?)
}

/// One garden, or `None` when the id does not resolve.
pub async fn get_garden(pool: &PgPool, garden_id: i64) -> Result<Option<Garden>, StoreError> {
    Ok(garden_db::get_garden(pool, garden_id).await?)
}

/// Validate an `addGarden` payload and persist it.
///
/// The returned row carries the assigned `garden_id`.
pub async fn create_garden(
    pool: &PgPool,
    validator: &SchemaValidator,
    payload: &Value,
) -> Result<Garden, StoreError> {
    let fields: GardenFields = validated(validator, SchemaName::AddGarden, payload)?;
    let garden = garden_db::insert_garden(pool, &fields).await?;
    info!(garden_id = garden.garden_id, name = %garden.name, "garden created");
    Ok(garden)
}

/// Overwrite `name`, `location` and `description` of an existing garden.
///
/// The payload is validated before the record is looked up: an invalid body
/// is a [`StoreError::Validation`] even for an unknown id, and a valid body
/// for an unknown id is [`StoreError::NotFound`]. An omitted `description`
/// clears the stored one.
pub async fn update_garden(
    pool: &PgPool,
    validator: &SchemaValidator,
    garden_id: i64,
    payload: &Value,
) -> Result<Garden, StoreError> {
    let fields: GardenFields = validated(validator, SchemaName::UpdateGarden, payload)?;

    if garden_db::get_garden(pool, garden_id).await?.is_none() {
        return Err(not_found(garden_id));
    }

    // The row can disappear between the load and the write.
    let garden = garden_db::update_garden(pool, garden_id, &fields)
        .await?
        .ok_or_else(|| not_found(garden_id))?;
    info!(garden_id, "garden updated");
    Ok(garden)
}

/// Delete a garden. Succeeds whether or not the id existed; plants that
/// referenced it are left in place.
pub async fn delete_garden(pool: &PgPool, garden_id: i64) -> Result<(), StoreError> {
    let removed = garden_db::delete_garden(pool, garden_id).await?;
    info!(garden_id, removed, "garden delete");
    Ok(())
}

fn not_found(garden_id: i64) -> StoreError {
    StoreError::NotFound {
        entity: Entity::Garden,
        id: garden_id.to_string(),
    }
}
