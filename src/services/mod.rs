/// OpenAPI documentation generation.
pub mod documentation;
/// Read-only listing of game lists.
pub mod game_list_service;
/// Health check service.
pub mod health_service;
/// Background task keeping a storage backend installed.
pub mod storage_supervisor;
