use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A garden row. `garden_id` and `date_created` are assigned by the database
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Garden {
    pub garden_id: i64,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
}

/// A plant row. `garden_id` points at the owning garden but is not a
/// foreign key: plants outlive a deleted garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    pub garden_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub status: String,
    pub date_planted: NaiveDate,
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// The mutable garden fields, used for both insert and full overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenFields {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields for a new plant. The owning garden comes from elsewhere, so any
/// `gardenId` in the source document is dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub status: String,
    pub date_planted: NaiveDate,
}

/// A partial plant update: every `Some` field replaces the stored value,
/// every `None` field is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub plant_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_planted: Option<NaiveDate>,
}

impl PlantChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.plant_type.is_none()
            && self.status.is_none()
            && self.date_planted.is_none()
    }
}
