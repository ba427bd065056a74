use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game_list;
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(game_list::router())
        .merge(docs::router())
        .with_state(state)
}
