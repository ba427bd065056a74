use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the installed store and report whether the backend runs degraded.
///
/// A failed probe is only logged here; the storage supervisor owns the degraded transition.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::from_degraded(state.is_degraded())
}
