use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CouchDaoError;
use crate::dao::models::{GameListEntity, GameRefEntity};

pub const GAME_LIST_PREFIX: &str = "game_list::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchGameListDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub name: String,
    #[serde(default)]
    pub games: Vec<GameRefEntity>,
}

impl CouchGameListDocument {
    pub fn try_into_entity(self) -> Result<GameListEntity, CouchDaoError> {
        let id = parse_game_list_doc_id(&self.id)?;
        let mut games = self.games;
        games.sort_by_key(|game| game.position);
        Ok(GameListEntity {
            id,
            name: self.name,
            games,
        })
    }
}

/// Convert `_all_docs` documents into entities sorted by numeric list identifier.
///
/// `_all_docs` orders by document ID as a string, so "game_list::10" arrives before "game_list::2".
pub fn into_ordered_entities(
    docs: impl IntoIterator<Item = CouchGameListDocument>,
) -> Result<Vec<GameListEntity>, CouchDaoError> {
    let mut entities = docs
        .into_iter()
        .map(CouchGameListDocument::try_into_entity)
        .collect::<Result<Vec<_>, _>>()?;
    entities.sort_by_key(|entity| entity.id);
    Ok(entities)
}

pub fn parse_game_list_doc_id(doc_id: &str) -> Result<i64, CouchDaoError> {
    let raw = doc_id
        .strip_prefix(GAME_LIST_PREFIX)
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_owned(),
            kind: "missing game_list prefix",
        })?;

    raw.parse::<i64>().map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_owned(),
        kind: "identifier is not an integer",
    })
}
