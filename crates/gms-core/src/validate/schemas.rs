//! JSON Schema documents for the four write payloads.

use serde_json::{Value, json};

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// `POST /gardens` and `PATCH /gardens/{gardenId}` share one shape: the
/// update overwrites all three mutable fields.
pub fn garden_fields() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "location": { "type": "string" },
            "description": { "type": "string" }
        },
        "required": ["name", "location"],
        "additionalProperties": false
    })
}

/// `POST /plants/{gardenId}`. A `gardenId` in the body is tolerated and then
/// ignored; the path decides the owner.
pub fn add_plant() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "type": { "type": "string" },
            "status": { "type": "string" },
            "datePlanted": { "type": "string", "pattern": DATE_PATTERN },
            "gardenId": { "type": "integer" }
        },
        "required": ["name", "type", "status", "datePlanted"],
        "additionalProperties": false
    })
}

/// `PATCH /plants/{plantId}`: any non-empty subset of the plant fields.
pub fn update_plant() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "type": { "type": "string" },
            "status": { "type": "string" },
            "datePlanted": { "type": "string", "pattern": DATE_PATTERN }
        },
        "minProperties": 1,
        "additionalProperties": false
    })
}
