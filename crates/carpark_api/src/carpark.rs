use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carpark_core::Carpark;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

/// Fail with a 404 unless `carpark_name` is the carpark served here.
pub(crate) fn ensure_carpark(carpark: &Carpark, carpark_name: &str) -> Result<(), Response> {
    if carpark.config().name == carpark_name {
        return Ok(());
    }
    tracing::warn!("Unknown carpark {}", carpark_name);
    Err((
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Carpark {} not found", carpark_name),
        }),
    )
        .into_response())
}

/// Get the carpark configuration, catalogue included
pub async fn get_carpark_config(
    State(carpark): State<Arc<Carpark>>,
    Path(carpark_name): Path<String>,
) -> Response {
    tracing::info!("Getting carpark configuration");
    if let Err(response) = ensure_carpark(&carpark, &carpark_name) {
        return response;
    }
    Json(carpark.config().clone()).into_response()
}
