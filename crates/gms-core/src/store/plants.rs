//! Plant store access.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use gms_db::models::{NewPlant, Plant, PlantChanges};
use gms_db::queries::plants as plant_db;

use super::{Entity, StoreError, parse_garden_id, validated};
use crate::validate::{SchemaName, SchemaValidator};

/// All plants in store order.
pub async fn list_plants(pool: &PgPool) -> Result<Vec<Plant>, StoreError> {
    Ok(plant_db::list_plants(pool).await?)
}

/// One plant, or `None` when the id does not resolve.
pub async fn get_plant(pool: &PgPool, id: Uuid) -> Result<Option<Plant>, StoreError> {
    Ok(plant_db::get_plant(pool, id).await?)
}

/// Validate an `addPlant` payload and persist it under the garden named by
/// `raw_garden_id`.
///
/// The owner always comes from the caller (the request path segment, parsed
/// only once the payload is valid); a `gardenId` inside the payload is
/// discarded. The garden is not checked for existence.
pub async fn create_plant(
    pool: &PgPool,
    validator: &SchemaValidator,
    raw_garden_id: &str,
    payload: &Value,
) -> Result<Plant, StoreError> {
    let new_plant: NewPlant = validated(validator, SchemaName::AddPlant, payload)?;
    let garden_id = parse_garden_id(raw_garden_id)?;
    let plant = plant_db::insert_plant(pool, garden_id, &new_plant).await?;
    info!(plant_id = %plant.id, garden_id, "plant created");
    Ok(plant)
}

/// Replace every field present in the payload; omitted fields keep their
/// stored value. The payload is validated before the record is looked up.
pub async fn update_plant(
    pool: &PgPool,
    validator: &SchemaValidator,
    id: Uuid,
    payload: &Value,
) -> Result<Plant, StoreError> {
    let changes: PlantChanges = validated(validator, SchemaName::UpdatePlant, payload)?;

    if plant_db::get_plant(pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let plant = plant_db::update_plant(pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(plant_id = %id, "plant updated");
    Ok(plant)
}

/// Delete a plant. Succeeds whether or not the id existed.
pub async fn delete_plant(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let removed = plant_db::delete_plant(pool, id).await?;
    info!(plant_id = %id, removed, "plant delete");
    Ok(())
}

fn not_found(id: Uuid) -> StoreError {
    StoreError::NotFound {
        entity: Entity::Plant,
        id: id.to_string(),
    }
}
