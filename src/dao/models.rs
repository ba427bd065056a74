use serde::{Deserialize, Serialize};

/// Curated list of games persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameListEntity {
    /// Primary key of the list.
    pub id: i64,
    /// Display name of the list.
    pub name: String,
    /// Games belonging to the list, ordered by their position.
    #[serde(default)]
    pub games: Vec<GameRefEntity>,
}

/// Reference from a game list to one of its games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRefEntity {
    /// Identifier of the referenced game.
    pub game_id: i64,
    /// Position of the game inside the list (0-based).
    pub position: i64,
}

impl GameListEntity {
    /// Build a list with no game references.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            games: Vec::new(),
        }
    }

    /// Attach the given game identifiers in order, assigning consecutive positions.
    pub fn with_games(mut self, game_ids: impl IntoIterator<Item = i64>) -> Self {
        self.games = (0_i64..)
            .zip(game_ids)
            .map(|(position, game_id)| GameRefEntity { game_id, position })
            .collect();
        self
    }
}
