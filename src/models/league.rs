//! League model.

use serde::{Deserialize, Serialize};

use super::LeagueId;

/// A league (team context). Partitions players and matches; never aggregated over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

impl League {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            id: LeagueId::default(),
            name: name.into(),
            active,
        }
    }

    pub fn with_id(mut self, id: impl Into<LeagueId>) -> Self {
        self.id = id.into();
        self
    }
}
