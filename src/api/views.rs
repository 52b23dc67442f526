//! Response rows shared by the public and admin endpoints.

use serde::Serialize;

use crate::calculate::{
    category_label, club_label, format_date, format_score, player_label, score_line, team_label,
    ClubTable, PlayerTable,
};
use crate::models::{CoParticipantStats, HistoryEntry, Match, Player, TeamSide};

/// A match as listed on the dashboard and in the admin match list.
#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub id: String,
    pub date: String,
    pub date_display: String,
    pub team1: String,
    pub team2: String,
    pub score: String,
    pub winner: TeamSide,
    pub winner_label: String,
}

impl MatchRow {
    pub fn new(m: &Match, players: &PlayerTable) -> Self {
        let team1 = team_label(players, &m.team1);
        let team2 = team_label(players, &m.team2);
        let winner_label = match m.winner() {
            TeamSide::Team1 => team1.clone(),
            TeamSide::Team2 => team2.clone(),
        };

        Self {
            id: m.id.to_string(),
            date: m.date.to_rfc3339(),
            date_display: format_date(Some(&m.date)),
            team1,
            team2,
            score: score_line(m),
            winner: m.winner(),
            winner_label,
        }
    }
}

/// Partner or opponent line in a player breakdown.
#[derive(Debug, Serialize)]
pub struct CoParticipantRow {
    pub player_id: String,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub effectiveness: f64,
}

impl CoParticipantRow {
    pub fn new(stats: &CoParticipantStats, players: &PlayerTable) -> Self {
        Self {
            player_id: stats.player_id.to_string(),
            name: player_label(players, &stats.player_id),
            matches: stats.matches,
            wins: stats.wins,
            losses: stats.losses(),
            effectiveness: stats.effectiveness(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub date: String,
    pub partner: String,
    pub opponents: String,
    pub won: bool,
    pub score: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            date: format_date(Some(&entry.date)),
            partner: entry.partner_name.clone(),
            opponents: entry.opponents_names.clone(),
            won: entry.won,
            score: format_score(&entry.sets, entry.super_tiebreak.as_ref()),
        }
    }
}

/// A player with club and category labels resolved.
#[derive(Debug, Serialize)]
pub struct PlayerRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub club_id: Option<String>,
    pub club: String,
    pub category: String,
}

impl PlayerRow {
    pub fn new(player: &Player, clubs: &ClubTable) -> Self {
        Self {
            id: player.id.to_string(),
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            name: player.display_name(),
            club_id: player.club().map(|c| c.to_string()),
            club: club_label(clubs, player),
            category: category_label(player),
        }
    }
}
