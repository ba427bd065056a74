/// Game list transfer objects.
pub mod game_list;
/// Health endpoint payloads.
pub mod health;
