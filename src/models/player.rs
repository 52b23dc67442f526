//! Player model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClubId, LeagueId, PlayerId};

/// A league player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: PlayerId,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Free-text category (e.g. "3ra", "Damas B")
    #[serde(default)]
    pub category: Option<String>,

    /// Club the player belongs to; `None` means unaffiliated
    #[serde(default)]
    pub club_id: Option<ClubId>,

    /// League context the player is listed under
    #[serde(default)]
    pub league_id: Option<LeagueId>,

    /// When this record was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new, unaffiliated player. The store assigns the ID on insert.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::default(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            category: None,
            club_id: None,
            league_id: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the ID.
    pub fn with_id(mut self, id: impl Into<PlayerId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method to set the club.
    pub fn with_club(mut self, club_id: impl Into<ClubId>) -> Self {
        self.club_id = Some(club_id.into());
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder method to set the league.
    pub fn with_league(mut self, league_id: impl Into<LeagueId>) -> Self {
        self.league_id = Some(league_id.into());
        self
    }

    /// "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Club reference, treating a blank ID as unaffiliated.
    ///
    /// Older records store an empty string when no club was picked.
    pub fn club(&self) -> Option<&ClubId> {
        self.club_id.as_ref().filter(|id| !id.is_blank())
    }

    /// Category, treating blank text as absent.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new("Ana", "Pérez").with_id("p1").with_club("c1");
        assert_eq!(player.id.as_str(), "p1");
        assert_eq!(player.display_name(), "Ana Pérez");
        assert_eq!(player.club().map(|c| c.as_str()), Some("c1"));
    }

    #[test]
    fn test_blank_club_is_unaffiliated() {
        let player = Player::new("Ana", "Pérez").with_club("");
        assert!(player.club().is_none());
    }

    #[test]
    fn test_blank_category_is_absent() {
        let player = Player::new("Ana", "Pérez").with_category("  ");
        assert!(player.category().is_none());
        let player = Player::new("Ana", "Pérez").with_category("4ta");
        assert_eq!(player.category(), Some("4ta"));
    }

    #[test]
    fn test_player_deserialize_minimal_document() {
        let json = r#"{"id":"p9","first_name":"Luis","last_name":"Gómez"}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id.as_str(), "p9");
        assert!(player.club_id.is_none());
        assert!(player.category.is_none());
    }
}
