use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use medinv_core::ServiceError;

use super::{AppState, bad_json, parse_identity};
use crate::model::DeviceRecord;
use crate::service::device::{DeviceFilters, DeviceOptions, DeviceStats};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(list_devices).post(create_device))
        .route("/devices/options", get(device_options))
        .route("/devices/stats", get(device_stats))
        .route(
            "/devices/{id}",
            get(get_device).put(update_device).delete(delete_device),
        )
}

#[derive(Deserialize)]
struct DeviceQuery {
    q: Option<String>,
    category: Option<String>,
    location: Option<String>,
}

/// Acknowledgement body for writes.
#[derive(Serialize)]
struct Ack {
    message: &'static str,
    #[serde(rename = "SequenceNumber", skip_serializing_if = "Option::is_none")]
    sequence_number: Option<u64>,
}

async fn list_devices(
    State(svc): State<AppState>,
    Query(q): Query<DeviceQuery>,
) -> Result<Json<Vec<DeviceRecord>>, ServiceError> {
    let filters = DeviceFilters {
        q: q.q,
        category: q.category,
        location: q.location,
    };
    Ok(Json(svc.list_devices(&filters)?))
}

async fn get_device(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceRecord>, ServiceError> {
    let id = parse_identity(&id)?;
    Ok(Json(svc.get_device(id)?))
}

async fn create_device(
    State(svc): State<AppState>,
    payload: Result<Json<DeviceRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Ack>), ServiceError> {
    let Json(record) = payload.map_err(bad_json)?;
    let created = svc.create_device(record)?;
    Ok((
        StatusCode::CREATED,
        Json(Ack {
            message: "Device added successfully",
            sequence_number: created.sequence_number,
        }),
    ))
}

async fn update_device(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DeviceRecord>, JsonRejection>,
) -> Result<Json<Ack>, ServiceError> {
    let id = parse_identity(&id)?;
    let Json(record) = payload.map_err(bad_json)?;
    svc.update_device(id, record)?;
    Ok(Json(Ack {
        message: "Device updated successfully",
        sequence_number: None,
    }))
}

async fn delete_device(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ServiceError> {
    let id = parse_identity(&id)?;
    svc.delete_device(id)?;
    Ok(Json(Ack {
        message: "Device deleted successfully",
        sequence_number: None,
    }))
}

async fn device_options(State(svc): State<AppState>) -> Result<Json<DeviceOptions>, ServiceError> {
    Ok(Json(svc.device_options()?))
}

async fn device_stats(State(svc): State<AppState>) -> Result<Json<DeviceStats>, ServiceError> {
    Ok(Json(svc.device_stats()?))
}
