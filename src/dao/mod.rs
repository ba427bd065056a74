/// Game list storage backends and the trait they implement.
pub mod game_list_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
