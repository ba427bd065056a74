use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::GameListEntity;

/// Read-only projection of a game list exposed by `GET /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GameListSummary {
    /// Identifier of the list.
    pub id: i64,
    /// Display name of the list.
    pub name: String,
}

impl From<&GameListEntity> for GameListSummary {
    fn from(entity: &GameListEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
        }
    }
}

impl From<GameListEntity> for GameListSummary {
    fn from(entity: GameListEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_copies_id_and_name() {
        let entity = GameListEntity::new(1, "Favorites");
        let summary = GameListSummary::from(&entity);
        assert_eq!(
            summary,
            GameListSummary {
                id: 1,
                name: "Favorites".into(),
            }
        );
    }

    #[test]
    fn game_references_are_not_projected() {
        let entity = GameListEntity::new(2, "Platformers").with_games([6, 7, 8]);
        let by_ref = GameListSummary::from(&entity);
        let by_value = GameListSummary::from(entity);

        assert_eq!(by_ref, by_value);
        assert_eq!(
            serde_json::to_value(&by_value).unwrap(),
            json!({ "id": 2, "name": "Platformers" })
        );
    }

    #[test]
    fn name_is_copied_verbatim() {
        let entity = GameListEntity::new(-5, "  Jogos de plataforma ");
        assert_eq!(GameListSummary::from(&entity).name, "  Jogos de plataforma ");
    }
}
