//! Health Routes - Liveness and database readiness checks

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use contactdesk::DomainError;

use crate::models::HealthReport;
use crate::{ContactAppState, MessageAppState};

pub fn contact_router() -> Router<ContactAppState> {
    Router::new()
        .route("/contacts/liveness", get(liveness))
        .route("/contacts/readiness", get(contact_readiness))
}

pub fn message_router() -> Router<MessageAppState> {
    Router::new()
        .route("/messages/liveness", get(liveness))
        .route("/messages/readiness", get(message_readiness))
}

/// Process is up
#[utoipa::path(
    get,
    path = "/contacts/liveness",
    responses(
        (status = 200, description = "Service is alive", body = String)
    ),
    tag = "Health"
)]
pub async fn liveness() -> &'static str {
    "Healthy"
}

/// Contact database is reachable
#[utoipa::path(
    get,
    path = "/contacts/readiness",
    responses(
        (status = 200, description = "Database reachable", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport)
    ),
    tag = "Health"
)]
pub async fn contact_readiness(
    State(state): State<ContactAppState>,
) -> (StatusCode, Json<HealthReport>) {
    readiness(state.contact_service.ping().await)
}

/// Message database is reachable
#[utoipa::path(
    get,
    path = "/messages/readiness",
    responses(
        (status = 200, description = "Database reachable", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport)
    ),
    tag = "Health"
)]
pub async fn message_readiness(
    State(state): State<MessageAppState>,
) -> (StatusCode, Json<HealthReport>) {
    readiness(state.message_service.ping().await)
}

fn readiness(result: Result<(), DomainError>) -> (StatusCode, Json<HealthReport>) {
    let report = HealthReport::database(result.map_err(|e| e.to_string()));

    if report.is_healthy() {
        (StatusCode::OK, Json(report))
    } else {
        tracing::warn!("Readiness check failed");
        (StatusCode::SERVICE_UNAVAILABLE, Json(report))
    }
}
