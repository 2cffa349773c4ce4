//! Carpark API Library
//!
//! This library provides the HTTP API for a carpark sharing a fixed power
//! budget between its charging points.

mod carpark;
mod charging_points;
mod config;

pub use crate::config::load_site_config;

use axum::{
    Router,
    routing::{get, put},
};
use carpark_core::Carpark;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(carpark: Carpark) -> Router {
    let shared_state = Arc::new(carpark);
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/carparks/{carpark_name}",
            get(carpark::get_carpark_config),
        )
        .route(
            "/carparks/{carpark_name}/chargingPoints",
            get(charging_points::list_charging_points),
        )
        .route(
            "/carparks/{carpark_name}/chargingPoints/{charging_point_id}",
            put(charging_points::update_charging_point),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use carpark_core::{ChargingPoint, SiteConfig};
    use tower::util::ServiceExt;

    pub fn create_test_app() -> Router {
        Router::new().route("/health", get(health_check))
    }

    fn test_carpark() -> Carpark {
        Carpark::new(SiteConfig {
            name: "TEST_CARPARK".into(),
            capacity: 4,
            total_power: 40,
            charging_points: Vec::new(),
        })
        .unwrap()
    }

    fn put_connected(uri: String, connected: bool) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("PUT")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_string(&charging_points::UpdateChargingPointRequest {
                    connected,
                })
                .unwrap(),
            ))
            .unwrap()
    }

    async fn list(app: &Router) -> Vec<ChargingPoint> {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/carparks/TEST_CARPARK/chargingPoints")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_integration_connect_and_disconnect() {
        let app = create_app(test_carpark());

        // Connect three points, the site has one free slot left
        for id in ["CP1", "CP2", "CP3"] {
            let response = app
                .clone()
                .oneshot(put_connected(
                    format!("/carparks/TEST_CARPARK/chargingPoints/{}", id),
                    true,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let report = list(&app).await;
        let currents: Vec<u32> = report.iter().map(|cp| cp.current).collect();
        assert_eq!(currents, vec![10, 10, 20, 0]);

        // Disconnect the oldest one
        let response = app
            .clone()
            .oneshot(put_connected(
                "/carparks/TEST_CARPARK/chargingPoints/CP1".to_string(),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = list(&app).await;
        let currents: Vec<u32> = report.iter().map(|cp| cp.current).collect();
        assert_eq!(currents, vec![0, 20, 20, 0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_integration_concurrent_connects() {
        let app = create_app(test_carpark());

        let requests = (0..30).map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(put_connected(
                    "/carparks/TEST_CARPARK/chargingPoints/CP3".to_string(),
                    true,
                ))
                .await
                .unwrap()
                .status()
            })
        });
        let mut statuses = Vec::new();
        for request in requests.collect::<Vec<_>>() {
            statuses.push(request.await.unwrap());
        }

        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
        assert_eq!(
            statuses
                .iter()
                .filter(|s| **s == StatusCode::CONFLICT)
                .count(),
            29
        );

        let report = list(&app).await;
        assert_eq!(report.iter().filter(|cp| cp.connected).count(), 1);
    }
}
