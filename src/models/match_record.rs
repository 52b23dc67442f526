//! A doubles match between two pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LeagueId, MatchId, PlayerId};
use crate::calculate::determine_winner;

/// Which side of the net a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Team1 => write!(f, "team1"),
            TeamSide::Team2 => write!(f, "team2"),
        }
    }
}

/// A pair of players. Both slots are required but may point at deleted players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

impl Team {
    pub fn new(player1_id: impl Into<PlayerId>, player2_id: impl Into<PlayerId>) -> Self {
        Self {
            player1_id: player1_id.into(),
            player2_id: player2_id.into(),
        }
    }

    pub fn players(&self) -> [&PlayerId; 2] {
        [&self.player1_id, &self.player2_id]
    }
}

/// Games won by each team in one set (or in the super-tie-break).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: u32,
    pub team2: u32,
}

impl SetScore {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    /// The side with strictly more games, `None` for a drawn set.
    pub fn set_winner(&self) -> Option<TeamSide> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(TeamSide::Team1),
            std::cmp::Ordering::Less => Some(TeamSide::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl std::fmt::Display for SetScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.team1, self.team2)
    }
}

/// A recorded match.
///
/// `winner` is always derived from `sets` when a match is built or edited;
/// records read back from the store keep whatever winner was persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: MatchId,

    /// League this match was played in (absent on legacy records)
    #[serde(default)]
    pub league_id: Option<LeagueId>,

    /// When the match was played
    pub date: DateTime<Utc>,

    pub team1: Team,
    pub team2: Team,

    /// Set scores in playing order
    #[serde(default)]
    pub sets: Vec<SetScore>,

    /// Optional deciding super-tie-break, recorded but not counted
    #[serde(default)]
    pub super_tiebreak: Option<SetScore>,

    winner: TeamSide,
}

impl Match {
    /// Build a match; the winner is computed from the sets.
    pub fn new(
        date: DateTime<Utc>,
        team1: Team,
        team2: Team,
        sets: Vec<SetScore>,
        super_tiebreak: Option<SetScore>,
    ) -> Self {
        let winner = determine_winner(&sets);
        Self {
            id: MatchId::default(),
            league_id: None,
            date,
            team1,
            team2,
            sets,
            super_tiebreak,
            winner,
        }
    }

    pub fn with_id(mut self, id: impl Into<MatchId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_league(mut self, league_id: impl Into<LeagueId>) -> Self {
        self.league_id = Some(league_id.into());
        self
    }

    pub fn winner(&self) -> TeamSide {
        self.winner
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    /// The four team slots in fixed order:
    /// team1/player1, team1/player2, team2/player1, team2/player2.
    pub fn slots(&self) -> [(TeamSide, &PlayerId); 4] {
        [
            (TeamSide::Team1, &self.team1.player1_id),
            (TeamSide::Team1, &self.team1.player2_id),
            (TeamSide::Team2, &self.team2.player1_id),
            (TeamSide::Team2, &self.team2.player2_id),
        ]
    }

    /// Team membership of a player; the first matching slot decides.
    pub fn side_of(&self, player_id: &PlayerId) -> Option<TeamSide> {
        self.slots()
            .into_iter()
            .find(|(_, id)| *id == player_id)
            .map(|(side, _)| side)
    }

    /// Slot position (0..4) of a player; the first matching slot decides.
    fn slot_of(&self, player_id: &PlayerId) -> Option<usize> {
        self.slots().iter().position(|(_, id)| *id == player_id)
    }

    pub fn involves(&self, player_id: &PlayerId) -> bool {
        self.slot_of(player_id).is_some()
    }

    /// The teammate in the slot paired with the player's first slot.
    pub fn partner_of(&self, player_id: &PlayerId) -> Option<&PlayerId> {
        let slots = self.slots();
        self.slot_of(player_id).map(|i| slots[i ^ 1].1)
    }

    /// Both players on the other team.
    pub fn opponents_of(&self, player_id: &PlayerId) -> Option<[&PlayerId; 2]> {
        self.side_of(player_id)
            .map(|side| self.team(side.opponent()).players())
    }

    /// Whether the given player's team won.
    pub fn won_by(&self, player_id: &PlayerId) -> bool {
        self.side_of(player_id) == Some(self.winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        Match::new(
            Utc::now(),
            Team::new("a", "b"),
            Team::new("c", "d"),
            vec![SetScore::new(6, 4), SetScore::new(3, 6), SetScore::new(6, 2)],
            None,
        )
    }

    #[test]
    fn test_winner_is_derived_from_sets() {
        assert_eq!(sample().winner(), TeamSide::Team1);
    }

    #[test]
    fn test_side_partner_and_opponents() {
        let m = sample();
        let b = PlayerId::from("b");
        let c = PlayerId::from("c");
        assert_eq!(m.side_of(&b), Some(TeamSide::Team1));
        assert_eq!(m.partner_of(&b).map(|p| p.as_str()), Some("a"));
        assert_eq!(m.partner_of(&c).map(|p| p.as_str()), Some("d"));
        let opponents = m.opponents_of(&b).unwrap();
        assert_eq!(opponents[0].as_str(), "c");
        assert_eq!(opponents[1].as_str(), "d");
        assert!(m.won_by(&b));
        assert!(!m.won_by(&c));
    }

    #[test]
    fn test_duplicate_player_resolves_to_first_slot() {
        let m = Match::new(
            Utc::now(),
            Team::new("x", "b"),
            Team::new("x", "d"),
            vec![SetScore::new(2, 6)],
            None,
        );
        let x = PlayerId::from("x");
        assert_eq!(m.side_of(&x), Some(TeamSide::Team1));
        assert_eq!(m.partner_of(&x).map(|p| p.as_str()), Some("b"));
        assert!(!m.won_by(&x));
    }

    #[test]
    fn test_absent_player() {
        let m = sample();
        let z = PlayerId::from("z");
        assert!(!m.involves(&z));
        assert!(m.partner_of(&z).is_none());
        assert!(m.opponents_of(&z).is_none());
    }

    #[test]
    fn test_match_serialization_field_names() {
        let m = sample().with_id("m1").with_league("l1");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["winner"], "team1");
        assert_eq!(json["team1"]["player1_id"], "a");
        assert_eq!(json["sets"][0]["team1"], 6);
        assert!(json["super_tiebreak"].is_null());

        let back: Match = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_set_score_display_and_winner() {
        assert_eq!(SetScore::new(7, 5).to_string(), "7-5");
        assert_eq!(SetScore::new(7, 5).set_winner(), Some(TeamSide::Team1));
        assert_eq!(SetScore::new(4, 6).set_winner(), Some(TeamSide::Team2));
        assert_eq!(SetScore::new(6, 6).set_winner(), None);
    }
}
