use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use gms_core::store::{self, StoreError, gardens, plants};
use gms_core::validate::SchemaValidator;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub validator: Arc<SchemaValidator>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Result<Self> {
        Ok(Self {
            pool,
            validator: Arc::new(SchemaValidator::new()?),
        })
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }

    /// Map a store failure for the operation described by `action`
    /// (e.g. "updating garden 7").
    ///
    /// Validation failures go back to the caller verbatim. Anything else is
    /// logged in full and answered with a generic message.
    fn from_store(err: StoreError, action: &str) -> Self {
        match err {
            StoreError::Validation(report) => Self::bad_request(report.to_string()),
            other => {
                tracing::error!(error = %format!("{other:#}"), "error while {action}");
                Self::internal(format!("Error while {action}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// A body that is not JSON (or not sent as JSON) is a client error like any
/// schema violation.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

fn store_err(action: impl Into<String>) -> impl FnOnce(StoreError) -> AppError {
    let action = action.into();
    move |err| AppError::from_store(err, &action)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenAck {
    pub message: &'static str,
    pub garden_id: i64,
}

#[derive(Debug, Serialize)]
pub struct PlantAck {
    pub message: &'static str,
    pub id: Uuid,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// `/plants/{id}` carries a garden id on POST and a plant id on every other
/// method, so the segment is taken as raw text and parsed per handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/gardens", get(list_gardens).post(create_garden))
        .route(
            "/gardens/{garden_id}",
            get(get_garden).patch(update_garden).delete(delete_garden),
        )
        .route("/plants", get(list_plants))
        .route(
            "/plants/{id}",
            get(get_plant)
                .post(create_plant)
                .patch(update_plant)
                .delete(delete_plant),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, bind: &str, port: u16) -> Result<()> {
    let app = build_router(AppState::new(pool)?);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("gms serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("gms serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Garden handlers
// ---------------------------------------------------------------------------

async fn list_gardens(State(state): State<AppState>) -> Result<Response, AppError> {
    let all = gardens::list_gardens(&state.pool)
        .await
        .map_err(store_err("getting gardens"))?;
    Ok(Json(all).into_response())
}

async fn get_garden(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let action = format!("getting garden {raw_id}");
    let id = store::parse_garden_id(&raw_id).map_err(store_err(action.clone()))?;
    let garden = gardens::get_garden(&state.pool, id)
        .await
        .map_err(store_err(action))?;
    Ok(Json(garden).into_response())
}

async fn create_garden(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let garden = gardens::create_garden(&state.pool, &state.validator, &payload)
        .await
        .map_err(store_err("creating garden"))?;
    Ok(Json(GardenAck {
        message: "Garden created successfully",
        garden_id: garden.garden_id,
    })
    .into_response())
}

async fn update_garden(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let action = format!("updating garden {raw_id}");
    let id = store::parse_garden_id(&raw_id).map_err(store_err(action.clone()))?;
    let garden = gardens::update_garden(&state.pool, &state.validator, id, &payload)
        .await
        .map_err(store_err(action))?;
    Ok(Json(GardenAck {
        message: "Garden updated successfully",
        garden_id: garden.garden_id,
    })
    .into_response())
}

async fn delete_garden(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let action = format!("deleting garden {raw_id}");
    let id = store::parse_garden_id(&raw_id).map_err(store_err(action.clone()))?;
    gardens::delete_garden(&state.pool, id)
        .await
        .map_err(store_err(action))?;
    Ok(Json(GardenAck {
        message: "Garden deleted successfully",
        garden_id: id,
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// Plant handlers
// ---------------------------------------------------------------------------

async fn list_plants(State(state): State<AppState>) -> Result<Response, AppError> {
    let all = plants::list_plants(&state.pool)
        .await
        .map_err(store_err("getting plants"))?;
    Ok(Json(all).into_response())
}

async fn get_plant(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let action = format!("getting plant {raw_id}");
    let id = store::parse_plant_id(&raw_id).map_err(store_err(action.clone()))?;
    let plant = plants::get_plant(&state.pool, id)
        .await
        .map_err(store_err(action))?;
    Ok(Json(plant).into_response())
}

/// `POST /plants/{gardenId}`: the path names the owning garden. The store
/// parses it after the body has passed validation.
async fn create_plant(
    State(state): State<AppState>,
    Path(raw_garden_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let action = format!("creating plant in garden {raw_garden_id}");
    let plant = plants::create_plant(&state.pool, &state.validator, &raw_garden_id, &payload)
        .await
        .map_err(store_err(action))?;
    Ok(Json(PlantAck {
        message: "Plant created successfully",
        id: plant.id,
    })
    .into_response())
}

async fn update_plant(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let action = format!("updating plant {raw_id}");
    let id = store::parse_plant_id(&raw_id).map_err(store_err(action.clone()))?;
    let plant = plants::update_plant(&state.pool, &state.validator, id, &payload)
        .await
        .map_err(store_err(action))?;
    Ok(Json(PlantAck {
        message: "Plant updated successfully",
        id: plant.id,
    })
    .into_response())
}

async fn delete_plant(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let action = format!("deleting plant {raw_id}");
    let id = store::parse_plant_id(&raw_id).map_err(store_err(action.clone()))?;
    plants::delete_plant(&state.pool, id)
        .await
        .map_err(store_err(action))?;
    Ok(Json(PlantAck {
        message: "Plant deleted successfully",
        id,
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
