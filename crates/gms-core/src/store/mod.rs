//! Store access for gardens and plants.
//!
//! Each write runs the payload through the [`SchemaValidator`] first and
//! only touches the database once the payload is structurally valid. Reads
//! and deletes go straight to the query layer.

mod error;
pub mod gardens;
pub mod plants;

pub use error::{Entity, StoreError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::validate::{Rule, SchemaName, SchemaValidator, ValidationReport};

/// Parse a garden id taken from a request path.
pub fn parse_garden_id(raw: &str) -> Result<i64, StoreError> {
    raw.trim().parse::<i64>().map_err(|_| StoreError::MalformedId {
        entity: Entity::Garden,
        id: raw.to_owned(),
    })
}

/// Parse a plant id taken from a request path.
pub fn parse_plant_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::MalformedId {
        entity: Entity::Plant,
        id: raw.to_owned(),
    })
}

/// Validate `payload` against `schema` and decode it into `T`.
///
/// A payload can pass the schema and still fail to decode (a well-shaped but
/// impossible date such as `2023-02-30`); that also counts as a validation
/// failure.
fn validated<T: DeserializeOwned>(
    validator: &SchemaValidator,
    schema: SchemaName,
    payload: &Value,
) -> Result<T, StoreError> {
    validator.validate(schema, payload).into_result()?;
    serde_json::from_value(payload.clone()).map_err(|e| {
        StoreError::Validation(ValidationReport::single(
            schema,
            "(body)",
            Rule::Format,
            e.to_string(),
        ))
    })
}
