//! Document store for league records.
//!
//! Four collections (`players`, `clubs`, `leagues`, `matches`) of JSON
//! documents. The core only sees the [`DocumentStore`] trait; the bundled
//! backend keeps one JSONL file per collection under the data directory.

mod jsonl;
mod query;
mod store;

pub use jsonl::*;
pub use query::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::EntityId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No document {id} in {collection}")]
    NotFound {
        collection: &'static str,
        id: EntityId,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// The store's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Players,
    Clubs,
    Leagues,
    Matches,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Players => "players",
            Collection::Clubs => "clubs",
            Collection::Leagues => "leagues",
            Collection::Matches => "matches",
        }
    }

    /// Get the filename for this collection.
    pub fn filename(&self) -> &'static str {
        match self {
            Collection::Players => "players.jsonl",
            Collection::Clubs => "clubs.jsonl",
            Collection::Leagues => "leagues.jsonl",
            Collection::Matches => "matches.jsonl",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.collections_dir().join(collection.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.collections_dir(), PathBuf::from("/data/collections"));
        assert_eq!(
            config.collection_path(Collection::Matches),
            PathBuf::from("/data/collections/matches.jsonl")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Players.name(), "players");
        assert_eq!(Collection::Clubs.filename(), "clubs.jsonl");
        assert_eq!(Collection::Leagues.to_string(), "leagues");
    }
}
