//! Club model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClubId;

/// A tennis club. Names are unique by convention only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(default)]
    pub id: ClubId,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ClubId::default(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ClubId>) -> Self {
        self.id = id.into();
        self
    }
}
