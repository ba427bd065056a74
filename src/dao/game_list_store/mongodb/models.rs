use serde::{Deserialize, Serialize};

use crate::dao::models::{GameListEntity, GameRefEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MongoGameListDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub games: Vec<MongoGameRefDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MongoGameRefDocument {
    pub game_id: i64,
    pub position: i64,
}

impl From<MongoGameListDocument> for GameListEntity {
    fn from(value: MongoGameListDocument) -> Self {
        let mut games: Vec<GameRefEntity> = value
            .games
            .into_iter()
            .map(|game| GameRefEntity {
                game_id: game.game_id,
                position: game.position,
            })
            .collect();
        games.sort_by_key(|game| game.position);

        Self {
            id: value.id,
            name: value.name,
            games,
        }
    }
}
