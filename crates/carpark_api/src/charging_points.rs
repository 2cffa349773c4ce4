use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carpark_core::{Carpark, ChargingPoint, ChargingPointError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::carpark::{ErrorResponse, ensure_carpark};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChargingPointRequest {
    pub connected: bool,
}

fn charging_point_error_to_response(error: ChargingPointError) -> impl IntoResponse {
    let status = match error {
        ChargingPointError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChargingPointError::Conflict { .. } => StatusCode::CONFLICT,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Connect or disconnect a charging point
pub async fn update_charging_point(
    State(carpark): State<Arc<Carpark>>,
    Path((carpark_name, charging_point_id)): Path<(String, String)>,
    Json(payload): Json<UpdateChargingPointRequest>,
) -> Response {
    if let Err(response) = ensure_carpark(&carpark, &carpark_name) {
        return response;
    }

    let result = if payload.connected {
        carpark.connect(&charging_point_id)
    } else {
        carpark.disconnect(&charging_point_id)
    };
    match result {
        Ok(charging_point) => (StatusCode::OK, Json(charging_point)).into_response(),
        Err(error) => charging_point_error_to_response(error).into_response(),
    }
}

/// List every charging point of the carpark with its current allocation
pub async fn list_charging_points(
    State(carpark): State<Arc<Carpark>>,
    Path(carpark_name): Path<String>,
) -> Response {
    tracing::info!("Listing charging points");
    if let Err(response) = ensure_carpark(&carpark, &carpark_name) {
        return response;
    }
    let report: Vec<ChargingPoint> = carpark.describe();
    Json(report).into_response()
}
