//! Health report DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Readiness report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// "Healthy" or "Unhealthy"
    pub status: String,
    pub checks: Vec<HealthCheckEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckEntry {
    pub name: String,
    pub status: String,
    pub description: String,
}

impl HealthReport {
    pub fn database(result: Result<(), String>) -> Self {
        let (status, description) = match result {
            Ok(()) => ("Healthy", "Database connection is healthy".to_string()),
            Err(e) => ("Unhealthy", format!("Database connection failed: {}", e)),
        };

        Self {
            status: status.to_string(),
            checks: vec![HealthCheckEntry {
                name: "database".to_string(),
                status: status.to_string(),
                description,
            }],
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "Healthy"
    }
}
