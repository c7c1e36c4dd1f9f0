//! Health check endpoints for liveness and readiness checks

use std::future::Future;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::DomainError;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Returns 200 with the running version
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: both stores must answer
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![
        run_check("user_store", state.user_service.count()).await,
        run_check("event_store", state.event_service.count()).await,
    ];

    let overall_status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn run_check(
    name: &str,
    check: impl Future<Output = Result<usize, DomainError>>,
) -> HealthCheck {
    let start = Instant::now();
    let result = check.await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(_) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            warn!(check = name, error = %e, "Readiness check failed");
            HealthCheck {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[tokio::test]
    async fn test_run_check_reports_failures() {
        let healthy = run_check("event_store", async { Ok(3) }).await;
        assert!(healthy.status == HealthStatus::Healthy);
        assert!(healthy.message.is_none());

        let failed = run_check("event_store", async {
            Err(DomainError::storage("connection refused"))
        })
        .await;
        assert!(failed.status == HealthStatus::Unhealthy);
        assert!(failed.message.unwrap().contains("connection refused"));
    }
}
