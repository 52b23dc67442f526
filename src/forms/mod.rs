//! Admin form handling.
//!
//! Forms turn raw user input into validated records. Nothing is written to
//! the store unless a form validates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Club, ClubId, LeagueId, Match, Player, SetScore, Team};

/// Number of set slots the match form offers.
pub const MAX_SET_SLOTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Enter at least one set")]
    NoSets,

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// One score row as typed into the form; either box may be left empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub team1: Option<u32>,
    pub team2: Option<u32>,
}

impl ScoreInput {
    pub fn new(team1: Option<u32>, team2: Option<u32>) -> Self {
        Self { team1, team2 }
    }

    /// The score, if both boxes were filled.
    pub fn filled(&self) -> Option<SetScore> {
        match (self.team1, self.team2) {
            (Some(a), Some(b)) => Some(SetScore::new(a, b)),
            _ => None,
        }
    }
}

/// The create/edit match form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchForm {
    #[serde(default)]
    pub league_id: Option<LeagueId>,

    /// Day played; stored at noon UTC. Defaults to now.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    pub team1: Team,
    pub team2: Team,

    #[serde(default)]
    pub sets: Vec<ScoreInput>,

    #[serde(default)]
    pub super_tiebreak: Option<ScoreInput>,
}

impl MatchForm {
    /// Sets with both scores filled, from the offered slots only.
    pub fn valid_sets(&self) -> Vec<SetScore> {
        self.sets
            .iter()
            .take(MAX_SET_SLOTS)
            .filter_map(ScoreInput::filled)
            .collect()
    }

    fn played_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.date
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(now)
    }

    /// Validate and build the match; the winner is computed from the sets.
    pub fn build(&self, now: DateTime<Utc>) -> Result<Match, FormError> {
        let sets = self.valid_sets();
        if sets.is_empty() {
            return Err(FormError::NoSets);
        }

        let super_tiebreak = self.super_tiebreak.as_ref().and_then(ScoreInput::filled);
        let mut m = Match::new(
            self.played_at(now),
            self.team1.clone(),
            self.team2.clone(),
            sets,
            super_tiebreak,
        );
        m.league_id = self.league_id.clone();
        Ok(m)
    }

    /// Prefill the form from a stored match, for editing.
    pub fn from_match(m: &Match) -> Self {
        let mut sets: Vec<ScoreInput> = m
            .sets
            .iter()
            .take(MAX_SET_SLOTS)
            .map(|s| ScoreInput::new(Some(s.team1), Some(s.team2)))
            .collect();
        sets.resize(MAX_SET_SLOTS, ScoreInput::default());

        Self {
            league_id: m.league_id.clone(),
            date: Some(m.date.date_naive()),
            team1: m.team1.clone(),
            team2: m.team2.clone(),
            sets,
            super_tiebreak: m
                .super_tiebreak
                .map(|s| ScoreInput::new(Some(s.team1), Some(s.team2))),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The create/edit player form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub club_id: Option<ClubId>,
    #[serde(default)]
    pub league_id: Option<LeagueId>,
}

impl PlayerForm {
    fn validated(&self) -> Result<(String, String), FormError> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if first.is_empty() {
            return Err(FormError::MissingField("first_name"));
        }
        if last.is_empty() {
            return Err(FormError::MissingField("last_name"));
        }
        Ok((first.to_string(), last.to_string()))
    }

    fn club(&self) -> Option<ClubId> {
        self.club_id.clone().filter(|c| !c.is_blank())
    }

    /// A new player record.
    pub fn build(&self) -> Result<Player, FormError> {
        let (first, last) = self.validated()?;
        let mut player = Player::new(first, last);
        player.category = blank_to_none(self.category.clone());
        player.club_id = self.club();
        player.league_id = self.league_id.clone().filter(|l| !l.is_blank());
        Ok(player)
    }

    /// Fields an edit overwrites. Identity, league and creation time are kept.
    pub fn changes(&self) -> Result<serde_json::Value, FormError> {
        let (first, last) = self.validated()?;
        Ok(serde_json::json!({
            "first_name": first,
            "last_name": last,
            "category": blank_to_none(self.category.clone()),
            "club_id": self.club(),
        }))
    }
}

/// The create club form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubForm {
    pub name: String,
}

impl ClubForm {
    pub fn build(&self) -> Result<Club, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingField("name"));
        }
        Ok(Club::new(name))
    }
}
