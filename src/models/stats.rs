//! Derived statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, SetScore};

/// Matches and wins shared with one co-participant (a partner or an opponent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoParticipantStats {
    pub player_id: PlayerId,

    /// Matches played together (partner) or against (opponent)
    pub matches: u32,

    /// Of those, matches the subject player won
    pub wins: u32,
}

impl CoParticipantStats {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            matches: 0,
            wins: 0,
        }
    }

    pub fn losses(&self) -> u32 {
        self.matches.saturating_sub(self.wins)
    }

    pub fn effectiveness(&self) -> f64 {
        crate::calculate::effectiveness(self.wins, self.matches)
    }
}

/// One line of a player's match history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub partner_name: String,
    /// Both opponents, joined with " / "
    pub opponents_names: String,
    pub won: bool,
    pub sets: Vec<SetScore>,
    pub super_tiebreak: Option<SetScore>,
}

/// Aggregated results for one player.
///
/// The league-wide aggregate fills only the totals; the single-player
/// aggregate also fills partners, opponents and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,

    /// Display name, or the unknown-player label
    pub name: String,

    /// Matches played
    pub matches: u32,

    pub wins: u32,

    pub losses: u32,

    /// wins / matches * 100, 0 when no matches
    pub effectiveness: f64,

    /// Partners in first-encounter order
    #[serde(default)]
    pub partners: Vec<CoParticipantStats>,

    /// Opponents in first-encounter order
    #[serde(default)]
    pub opponents: Vec<CoParticipantStats>,

    /// Matches in stored order
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl PlayerStats {
    /// A zeroed record.
    pub fn new(player_id: PlayerId, name: String) -> Self {
        Self {
            player_id,
            name,
            matches: 0,
            wins: 0,
            losses: 0,
            effectiveness: 0.0,
            partners: Vec::new(),
            opponents: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Count one match result.
    pub fn record_result(&mut self, won: bool) {
        self.matches += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Recompute effectiveness from the totals.
    pub fn finalize(&mut self) {
        self.effectiveness = crate::calculate::effectiveness(self.wins, self.matches);
    }

    pub fn partner(&self, id: &PlayerId) -> Option<&CoParticipantStats> {
        self.partners.iter().find(|p| &p.player_id == id)
    }

    pub fn opponent(&self, id: &PlayerId) -> Option<&CoParticipantStats> {
        self.opponents.iter().find(|p| &p.player_id == id)
    }
}

/// One row of the ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRow {
    /// 1-based position in the final sort order
    pub position: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// Full precision
    pub effectiveness: f64,
    /// Rounded to one decimal place, e.g. "66.7"
    pub effectiveness_display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_result_and_finalize() {
        let mut stats = PlayerStats::new("p1".into(), "Ana Pérez".to_string());
        stats.record_result(true);
        stats.record_result(false);
        stats.record_result(true);
        stats.finalize();

        assert_eq!(stats.matches, 3);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert!((stats.effectiveness - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zeroed_stats() {
        let mut stats = PlayerStats::new("p1".into(), "Ana Pérez".to_string());
        stats.finalize();
        assert_eq!(stats.matches, 0);
        assert_eq!(stats.effectiveness, 0.0);
    }

    #[test]
    fn test_co_participant_losses() {
        let co = CoParticipantStats {
            player_id: "p2".into(),
            matches: 5,
            wins: 3,
        };
        assert_eq!(co.losses(), 2);
        assert!((co.effectiveness() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_co_participant_losses_with_inconsistent_record() {
        let co: CoParticipantStats =
            serde_json::from_str(r#"{"player_id": "p2", "matches": 1, "wins": 4}"#).unwrap();
        assert_eq!(co.losses(), 0);
    }
}
