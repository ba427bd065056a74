use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall service condition reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// A storage backend is installed and answering.
    Ok,
    /// No healthy storage backend; listing requests will fail.
    Degraded,
}

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current health status.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Build the payload for the given degraded flag.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
