use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the game list backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game_list::list_game_lists,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::game_list::GameListSummary,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "lists", description = "Read-only access to game lists"),
    )
)]
pub struct ApiDoc;
