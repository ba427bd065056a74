use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::game_list::GameListSummary, error::AppError, services::game_list_service,
    state::SharedState,
};

/// Read-only routes over the stored game lists.
pub fn router() -> Router<SharedState> {
    Router::new().route("/lists", get(list_game_lists))
}

#[utoipa::path(
    get,
    path = "/lists",
    tag = "lists",
    responses(
        (status = 200, description = "Every stored game list", body = [GameListSummary]),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
/// Return a summary of every stored game list.
pub async fn list_game_lists(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameListSummary>>, AppError> {
    let payload = game_list_service::find_all(&state).await?;
    Ok(Json(payload))
}
